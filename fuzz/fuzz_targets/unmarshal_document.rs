#![no_main]
use codeintel_pack::{compress, Codec, JsonCodec};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let codec = JsonCodec::new();
    // Raw input exercises the decompressor; compressed input exercises the decoder.
    let _ = codec.unmarshal_document_data(data);
    if let Ok(enc) = compress::compress(data) {
        if let Ok(doc) = codec.unmarshal_document_data(&enc) {
            let enc = codec.marshal_document_data(&doc).unwrap();
            assert_eq!(codec.unmarshal_document_data(&enc).unwrap(), doc);
        }
    }
});
