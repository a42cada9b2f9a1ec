#![no_main]

use cursor::{ByteReader, Endian};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut reader = ByteReader::new(data);
    let mut idx = 0usize;

    // Use input bytes to drive a bounded sequence of operations.
    while idx < data.len() && idx < 1024 {
        let op = data[idx] % 6;
        let endian = Endian::from_big_endian_flag(data[idx] & 0x80 != 0);
        idx += 1;

        match op {
            0 => {
                let _ = reader.read_u32(endian);
            }
            1 => {
                let _ = reader.read_i32(endian);
            }
            2 => {
                let _ = reader.read_f32(endian);
            }
            3 => {
                let len = usize::from(data[idx.saturating_sub(1)] % 32);
                let _ = reader.read_bytes(len);
            }
            4 => {
                let _ = reader.read_array::<12>();
            }
            _ => {
                let target = usize::from(data[idx.saturating_sub(1)]) * 4;
                let _ = reader.seek(target);
            }
        }
    }
});
