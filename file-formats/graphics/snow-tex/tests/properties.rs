//! Property tests: arbitrary input never panics and decodes deterministically

use proptest::prelude::*;
use snow_data::ByteRegion;
use snow_tex::{MAX_DIMENSION, decode_texture};

fn texture_like() -> impl Strategy<Value = Vec<u8>> {
    (
        prop::collection::vec(any::<u8>(), 0x100..0x700),
        prop_oneof![Just(3u8), Just(4u8), any::<u8>()],
        prop_oneof![1u16..32, any::<u16>()],
        prop_oneof![1u16..32, any::<u16>()],
    )
        .prop_map(|(mut data, loop_count, width, height)| {
            data[0..2].copy_from_slice(&width.to_le_bytes());
            data[2..4].copy_from_slice(&height.to_le_bytes());
            data[0x80] = loop_count;
            data[0x81] = 0;
            data
        })
}

proptest! {
    #[test]
    fn decode_is_total_and_deterministic(data in texture_like()) {
        let region = ByteRegion::whole(&data);
        let first = decode_texture(&region);
        let second = decode_texture(&region);
        prop_assert_eq!(&first, &second);
        if let Ok(texture) = first {
            prop_assert!(texture.written_texels() <= texture.pixels().len());
            prop_assert!(texture.width() as usize <= MAX_DIMENSION);
            prop_assert!(texture.height() as usize <= MAX_DIMENSION);
        }
    }
}
