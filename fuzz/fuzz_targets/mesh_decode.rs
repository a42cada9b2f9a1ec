#![no_main]

use cursor::Endian;
use libfuzzer_sys::fuzz_target;
use navmesh::{decode_nav_mesh_bytes, encode_nav_mesh_to_vec, DecodeLimits};

fuzz_target!(|data: &[u8]| {
    let Some((&flag, bytes)) = data.split_first() else {
        return;
    };
    let endian = Endian::from_big_endian_flag(flag & 1 != 0);
    let limits = DecodeLimits::for_testing();

    // Anything that decodes must encode and decode again to the same graph.
    if let Ok(mesh) = decode_nav_mesh_bytes(bytes, endian, &limits) {
        let encoded = encode_nav_mesh_to_vec(&mesh, endian).expect("decoded mesh encodes");
        let again = decode_nav_mesh_bytes(&encoded, endian, &DecodeLimits::unlimited())
            .expect("re-encoded mesh decodes");
        assert_eq!(
            encode_nav_mesh_to_vec(&again, endian).expect("second encode"),
            encoded
        );
    }
});
