#![no_main]
use codeintel_pack::{compress, Codec, JsonCodec};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let codec = JsonCodec::new();
    let _ = codec.unmarshal_result_chunk_data(data);
    if let Ok(enc) = compress::compress(data) {
        if let Ok(chunk) = codec.unmarshal_result_chunk_data(&enc) {
            let enc = codec.marshal_result_chunk_data(&chunk).unwrap();
            assert_eq!(codec.unmarshal_result_chunk_data(&enc).unwrap(), chunk);
        }
    }
});
