#![no_main]
use libfuzzer_sys::fuzz_target;
use zenilbm::*;

fuzz_target!(|data: &[u8]| {
    // If we can decode it, re-encoding and decoding again must produce identical pixels
    let limits = Limits {
        max_pixels: Some(1 << 22),
        ..Default::default()
    };
    let Ok(decoded) = DecodeRequest::new(data)
        .with_limits(&limits)
        .decode(enough::Unstoppable)
    else {
        return;
    };
    if decoded.planes == 0 {
        return;
    }

    let request = match decoded.form {
        FormType::Ilbm => EncodeRequest::ilbm(),
        _ => EncodeRequest::pbm(),
    };
    let Ok(reencoded) = request.encode(
        decoded.pixels(),
        decoded.width,
        decoded.height,
        decoded.planes,
        enough::Unstoppable,
    ) else {
        return;
    };
    let Ok(decoded2) = DecodeRequest::new(&reencoded).decode(enough::Unstoppable) else {
        panic!("re-encoded data failed to decode");
    };

    assert_eq!(decoded.pixels(), decoded2.pixels(), "roundtrip pixel mismatch");
    assert_eq!(decoded.width, decoded2.width);
    assert_eq!(decoded.height, decoded2.height);
});
