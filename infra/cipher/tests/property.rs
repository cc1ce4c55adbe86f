use ggnet_cipher::{EncryptionKey, IV_LEN, copy_decrypt, copy_encrypt};
use proptest::prelude::*;
use std::io::Cursor;

proptest! {
    #[test]
    fn roundtrip_arbitrary_bytes(data in proptest::collection::vec(any::<u8>(), 0..40_000)) {
        let key = EncryptionKey::derive("ikm", "salt", "property").unwrap();

        let mut sealed = Vec::new();
        copy_encrypt(&key, &mut Cursor::new(&data), &mut sealed).unwrap();
        prop_assert_eq!(sealed.len(), data.len() + IV_LEN);

        let mut opened = Vec::new();
        let n = copy_decrypt(&key, &mut Cursor::new(&sealed), &mut opened).unwrap();
        prop_assert_eq!(n, data.len() as u64);
        prop_assert_eq!(opened, data);
    }
}
