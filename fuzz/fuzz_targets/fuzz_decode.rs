#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Probe and full decode must never panic
    let _ = zenilbm::ImageInfo::from_bytes(data);
    let _ = zenilbm::DecodeRequest::new(data).decode(enough::Unstoppable);

    // Raw byte-run stream into a fixed scanline
    let mut row = [0u8; 320];
    let _ = zenilbm::byterun::unpack(data, &mut row);
});
