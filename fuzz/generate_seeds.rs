#!/usr/bin/env -S cargo +nightly -Zscript
//! Generate seed corpus files for fuzzing.
//! Run: cargo +nightly -Zscript fuzz/generate_seeds.rs

fn chunk(out: &mut Vec<u8>, id: &[u8; 4], data: &[u8]) {
    out.extend_from_slice(id);
    out.extend_from_slice(&(data.len() as u32).to_be_bytes());
    out.extend_from_slice(data);
    if data.len() % 2 == 1 {
        out.push(0);
    }
}

fn form(form_type: &[u8; 4], chunks: &[u8]) -> Vec<u8> {
    let mut out = b"FORM".to_vec();
    out.extend_from_slice(&((chunks.len() + 4) as u32).to_be_bytes());
    out.extend_from_slice(form_type);
    out.extend_from_slice(chunks);
    out
}

fn bmhd(width: u16, height: u16, planes: u8, masking: u8, compression: u8) -> [u8; 20] {
    let mut b = [0u8; 20];
    b[0..2].copy_from_slice(&width.to_be_bytes());
    b[2..4].copy_from_slice(&height.to_be_bytes());
    b[8] = planes;
    b[9] = masking;
    b[10] = compression;
    b
}

fn main() {
    use std::fs;
    let dir = "fuzz/corpus/fuzz_decode";
    fs::create_dir_all(dir).unwrap();

    // ILBM 8x2, 2 planes, uncompressed, 4-colour CMAP
    let mut c = Vec::new();
    chunk(&mut c, b"BMHD", &bmhd(8, 2, 2, 0, 0));
    chunk(&mut c, b"CMAP", &[0, 0, 0, 255, 0, 0, 0, 255, 0, 0, 0, 255]);
    chunk(&mut c, b"BODY", &[0xF0, 0x0F, 0xFF, 0x00]);
    fs::write(format!("{dir}/ilbm_8x2.lbm"), form(b"ILBM", &c)).unwrap();

    // ILBM 16x1, 1 plane + mask, ByteRun1 with a no-op code
    let mut c = Vec::new();
    chunk(&mut c, b"BMHD", &bmhd(16, 1, 1, 1, 1));
    chunk(&mut c, b"BODY", &[0x80, 0xFF, 0xAA, 0xFF, 0xFF]);
    fs::write(format!("{dir}/ilbm_mask.lbm"), form(b"ILBM", &c)).unwrap();

    // PBM 8x1, ByteRun1
    let mut c = Vec::new();
    chunk(&mut c, b"BMHD", &bmhd(8, 1, 8, 0, 1));
    chunk(&mut c, b"BODY", &[0xF9, 0x11]);
    fs::write(format!("{dir}/pbm_8x1.lbm"), form(b"PBM ", &c)).unwrap();

    // Truncated/malformed seeds for edge coverage
    fs::write(format!("{dir}/empty.bin"), b"").unwrap();
    fs::write(format!("{dir}/just_form.bin"), b"FORM").unwrap();
    fs::write(format!("{dir}/form_no_type.bin"), b"FORM\x00\x00\x00\x04").unwrap();
    fs::write(format!("{dir}/ilbm_no_chunks.bin"), form(b"ILBM", &[])).unwrap();

    println!("Generated seed corpus in {dir}/");
}
