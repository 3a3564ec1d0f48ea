// SPDX-License-Identifier: Apache-2.0
//! Encoding for [`ApplicationInfoInfo`] and [`ApplicationBlobLinkInfo`].

use crate::error::CodecError;
use crate::wire::{Reader, Writer};
use fossilize_model::{ApplicationBlobLinkInfo, ApplicationInfoInfo};

/// Encodes an [`ApplicationInfoInfo`].
pub fn encode_info(info: &ApplicationInfoInfo, w: &mut Writer) {
    w.string(&info.application_name)
        .u32(info.application_version)
        .string(&info.engine_name)
        .u32(info.engine_version)
        .u32(info.api_version);
}

/// Decodes an [`ApplicationInfoInfo`].
pub fn decode_info(r: &mut Reader<'_>) -> Result<ApplicationInfoInfo, CodecError> {
    Ok(ApplicationInfoInfo {
        application_name: r.string()?,
        application_version: r.u32()?,
        engine_name: r.string()?,
        engine_version: r.u32()?,
        api_version: r.u32()?,
    })
}

/// Encodes an [`ApplicationBlobLinkInfo`].
pub fn encode_blob_link(info: &ApplicationBlobLinkInfo, w: &mut Writer) {
    w.u32(info.tag).bytes(&info.data);
}

/// Decodes an [`ApplicationBlobLinkInfo`].
pub fn decode_blob_link(r: &mut Reader<'_>) -> Result<ApplicationBlobLinkInfo, CodecError> {
    Ok(ApplicationBlobLinkInfo {
        tag: r.u32()?,
        data: r.bytes()?.to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_application_info() {
        let info = ApplicationInfoInfo {
            application_name: "demo".to_owned(),
            application_version: 1,
            engine_name: "fossilize-demo".to_owned(),
            engine_version: 2,
            api_version: 0x0040_1000,
        };
        let mut w = Writer::new();
        encode_info(&info, &mut w);
        let bytes = w.into_bytes();
        let mut r = Reader::new(&bytes);
        assert_eq!(decode_info(&mut r).unwrap(), info);
    }

    #[test]
    fn round_trips_blob_link() {
        let info = ApplicationBlobLinkInfo {
            tag: 7,
            data: vec![9, 8, 7],
        };
        let mut w = Writer::new();
        encode_blob_link(&info, &mut w);
        let bytes = w.into_bytes();
        let mut r = Reader::new(&bytes);
        assert_eq!(decode_blob_link(&mut r).unwrap(), info);
    }
}
