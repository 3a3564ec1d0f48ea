// SPDX-License-Identifier: Apache-2.0
//! Encoding for [`ShaderModuleInfo`].

use crate::error::CodecError;
use crate::wire::{Reader, Writer};
use fossilize_model::ShaderModuleInfo;

const KIND_CODE: u8 = 0;
const KIND_IDENTIFIER: u8 = 1;

/// Encodes a [`ShaderModuleInfo`]. SPIR-V code streams go through the varint word encoding.
pub fn encode(info: &ShaderModuleInfo, w: &mut Writer) {
    match info {
        ShaderModuleInfo::Code(words) => {
            w.u8(KIND_CODE);
            w.spirv_words(words);
        }
        ShaderModuleInfo::Identifier {
            algorithm_uuid,
            identifier,
        } => {
            w.u8(KIND_IDENTIFIER);
            w.bytes(algorithm_uuid);
            w.bytes(identifier);
        }
    }
}

/// Decodes a [`ShaderModuleInfo`].
pub fn decode(r: &mut Reader<'_>) -> Result<ShaderModuleInfo, CodecError> {
    match r.u8()? {
        KIND_CODE => Ok(ShaderModuleInfo::Code(r.spirv_words()?)),
        KIND_IDENTIFIER => {
            let uuid_bytes = r.bytes()?;
            let algorithm_uuid: [u8; 16] = uuid_bytes.try_into().map_err(|_| {
                CodecError::TrailingGarbage {
                    context: "shader module identifier algorithm UUID",
                    trailing: uuid_bytes.len().saturating_sub(16),
                }
            })?;
            Ok(ShaderModuleInfo::Identifier {
                algorithm_uuid,
                identifier: r.bytes()?.to_vec(),
            })
        }
        other => Err(CodecError::UnknownTag(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_spirv_code() {
        let info = ShaderModuleInfo::from_code(vec![0xdead_beef, 0xcafe_babe]);
        let mut w = Writer::new();
        encode(&info, &mut w);
        let bytes = w.into_bytes();
        let mut r = Reader::new(&bytes);
        assert_eq!(decode(&mut r).unwrap(), info);
    }

    #[test]
    fn round_trips_driver_identifier() {
        let info = ShaderModuleInfo::Identifier {
            algorithm_uuid: [7; 16],
            identifier: vec![1, 2, 3, 4, 5],
        };
        let mut w = Writer::new();
        encode(&info, &mut w);
        let bytes = w.into_bytes();
        let mut r = Reader::new(&bytes);
        assert_eq!(decode(&mut r).unwrap(), info);
    }
}
