#![no_main]

use libfuzzer_sys::fuzz_target;
use packet::{read_frame, Packet, PACKET_MAXSIZE};

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }
    let ops = data[0];
    let Ok(mut packet) = Packet::from_buffer(data[1..].to_vec()) else {
        return;
    };
    let _ = packet.get_header();

    // Use the first input byte to drive a bounded sequence of reads.
    for step in 0..64u32 {
        let before = packet.position();
        let ok = match (ops.rotate_left(step) ^ step as u8) % 7 {
            0 => packet.read_byte().is_ok(),
            1 => packet.read_bool().is_ok(),
            2 => packet.read_short().is_ok(),
            3 => packet.read_int().is_ok(),
            4 => packet.read_long().is_ok(),
            5 => packet.read_string().is_ok(),
            _ => packet.read_buffer(usize::from(ops % 16)).is_ok(),
        };
        if !ok {
            assert_eq!(packet.position(), before);
        }
        assert!(packet.position() <= packet.capacity());
    }

    let _ = read_frame(&mut &data[1..], PACKET_MAXSIZE);
});
