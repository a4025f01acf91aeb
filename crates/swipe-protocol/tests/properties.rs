// crates/swipe-protocol/tests/properties.rs
use proptest::prelude::*;

use swipe_core::{define_field, define_schema, BuyQuery, DiningHallBitfield, PriceCents, Schema};
use swipe_protocol::{AcceptAll, ByteOrder, DecodeError, DecodedMessage, MessageBuilder, SECRET_LEN};

define_field!(Alpha, Beta, Gamma, Delta);

define_schema! {
    Wide = 0x7FFF_FFFF { Alpha, Beta, Gamma, Delta }
}

fn byte_order() -> impl Strategy<Value = ByteOrder> {
    prop_oneof![Just(ByteOrder::Native), Just(ByteOrder::Swapped)]
}

proptest! {
    #[test]
    fn encode_then_decode_reproduces_fields(
        sender in any::<u64>(),
        secret in prop::collection::vec(any::<u8>(), 0..=SECRET_LEN),
        values in any::<[u64; 4]>(),
        text in prop::collection::vec(any::<u8>(), 0..64),
        order in byte_order(),
    ) {
        let bytes = MessageBuilder::<Wide>::new(sender)
            .secret(&secret)
            .unwrap()
            .set::<Alpha>(values[0])
            .set::<Beta>(values[1])
            .set::<Gamma>(values[2])
            .set::<Delta>(values[3])
            .text(text.clone())
            .to_bytes(order);

        let msg = DecodedMessage::<Wide>::decode(&bytes, &AcceptAll).unwrap();
        prop_assert_eq!(msg.sender_id().get(), sender);
        prop_assert_eq!(msg.value::<Alpha>(), values[0]);
        prop_assert_eq!(msg.value::<Beta>(), values[1]);
        prop_assert_eq!(msg.value::<Gamma>(), values[2]);
        prop_assert_eq!(msg.value::<Delta>(), values[3]);
        prop_assert_eq!(msg.text(), &text[..]);
        prop_assert_eq!(msg.byte_order(), order);
    }

    #[test]
    fn swapped_and_native_encodings_agree(
        sender in any::<u64>(),
        price in any::<u64>(),
        halls in any::<u64>(),
        text in "[ -~]{0,40}",
    ) {
        let builder = MessageBuilder::<BuyQuery>::new(sender)
            .set::<PriceCents>(price)
            .set::<DiningHallBitfield>(halls)
            .text(text.as_bytes());

        let native = DecodedMessage::<BuyQuery>::decode(&builder.to_bytes(ByteOrder::Native), &AcceptAll).unwrap();
        let swapped = DecodedMessage::<BuyQuery>::decode(&builder.to_bytes(ByteOrder::Swapped), &AcceptAll).unwrap();

        prop_assert_eq!(native.values(), swapped.values());
        prop_assert_eq!(native.sender_id(), swapped.sender_id());
        prop_assert_eq!(native.text_lossy(), swapped.text_lossy());
    }

    #[test]
    fn any_other_magic_is_rejected(magic in any::<u64>()) {
        let expected = BuyQuery::magic_number();
        prop_assume!(magic != expected && magic != expected.swap_bytes());

        let mut bytes = MessageBuilder::<BuyQuery>::new(1).to_bytes(ByteOrder::Native);
        bytes[72..80].copy_from_slice(&magic.to_ne_bytes());

        let err = DecodedMessage::<BuyQuery>::decode(&bytes, &AcceptAll).unwrap_err();
        prop_assert_eq!(err, DecodeError::WrongMagicNumber { expected: 88, actual: magic });
    }

    #[test]
    fn arbitrary_bytes_never_panic(bytes in prop::collection::vec(any::<u8>(), 0..256)) {
        let _ = DecodedMessage::<BuyQuery>::decode(&bytes, &AcceptAll);
        let _ = DecodedMessage::<Wide>::decode(&bytes, &AcceptAll);
    }

    #[test]
    fn truncation_below_minimum_fails(cut in 0usize..(80 + 4 * 8)) {
        let bytes = MessageBuilder::<Wide>::new(9).text("tail").to_bytes(ByteOrder::Native);
        let err = DecodedMessage::<Wide>::decode(&bytes[..cut], &AcceptAll).unwrap_err();
        if cut < 80 {
            prop_assert!(
                matches!(err, DecodeError::TooShortForHeader { .. }),
                "cut {} gave {:?}",
                cut,
                err
            );
        } else {
            prop_assert!(
                matches!(err, DecodeError::TooShortForMessage { .. }),
                "cut {} gave {:?}",
                cut,
                err
            );
        }
    }
}
