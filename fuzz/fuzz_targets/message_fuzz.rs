//! Message fuzz target: feed arbitrary bytes to the KNXnet/IP decoder.
//! Decoding must not panic, and whatever decodes must re-encode: byte for byte
//! when no reserved field was off, otherwise to bytes that decode to the same message.
//! Build with: cargo fuzz run message_fuzz (requires nightly and cargo fuzz).

#![cfg_attr(fuzzing, no_main)]

#[cfg(fuzzing)]
use knxcodec::Message;
#[cfg(fuzzing)]
use libfuzzer_sys::fuzz_target;

#[cfg(fuzzing)]
fuzz_target!(|data: &[u8]| {
    let codec = knxcodec::Codec::default();
    if let Ok(decoded) = codec.decode_message(data) {
        let bytes = codec.encode_message(&decoded.message).expect("decoded message re-encodes");
        assert_eq!(bytes.len(), decoded.message.length_in_bytes());
        if decoded.diagnostics.is_empty() {
            assert_eq!(bytes, &data[..decoded.consumed]);
        } else {
            let again = codec.decode_message(&bytes).expect("re-encoded message decodes");
            assert!(again.diagnostics.is_empty());
            assert_eq!(again.message, decoded.message);
        }
    }
    let _ = codec.decode_frame(data);
});

#[cfg(not(fuzzing))]
fn main() {
    eprintln!("Build with: cargo fuzz run message_fuzz");
}
