use jitc::seq::{ArraySeq, SeqError, Sequence, StackSeq, Storage};

#[test]
fn test_push_pop_lifo() {
    for storage in [Storage::Array, Storage::Stack] {
        let mut seq: Box<dyn Sequence<String>> = storage.build();
        let words = ["alpha", "beta", "gamma", "delta"];

        for word in words {
            seq.push(word.to_string());
        }
        assert_eq!(seq.len(), words.len());

        for word in words.iter().rev() {
            assert_eq!(seq.pop().as_deref(), Ok(*word));
        }
        assert_eq!(seq.len(), 0);
        assert_eq!(seq.pop(), Err(SeqError::Empty));
    }
}

#[test]
fn test_interleaved_push_pop() {
    for storage in [Storage::Array, Storage::Stack] {
        let mut seq = storage.build();
        seq.push(1);
        seq.push(2);
        assert_eq!(seq.pop(), Ok(2));
        seq.push(3);
        seq.push(4);
        assert_eq!(seq.pop(), Ok(4));
        assert_eq!(seq.pop(), Ok(3));
        assert_eq!(seq.pop(), Ok(1));
        assert!(seq.is_empty());
    }
}

#[test]
fn test_array_access_boundaries() {
    let mut seq = ArraySeq::new();
    for n in 10..15 {
        seq.push(n);
    }
    let len = seq.len();

    assert!(seq.access(0).is_err());
    assert_eq!(seq.get(0), None);
    assert_eq!(seq.access(1), Ok(&11));
    assert_eq!(seq.access(len - 1), Ok(&14));
    assert_eq!(seq.access(len), Err(SeqError::OutOfRange { index: len, len }));
    assert_eq!(seq.get(len), None);
    assert_eq!(seq.capacity(), len);
}

#[test]
fn test_stack_access_boundaries() {
    let mut seq = StackSeq::new();
    for n in 10..15 {
        seq.push(n);
    }
    let len = seq.len();

    assert_eq!(seq.access(0), Ok(&14));
    assert_eq!(seq.access(len - 1), Ok(&10));
    assert_eq!(seq.access(len), Err(SeqError::OutOfRange { index: len, len }));
}

#[test]
fn test_empty_access() {
    for storage in [Storage::Array, Storage::Stack] {
        let seq = storage.build::<u8>();
        assert_eq!(seq.access(0), Err(SeqError::OutOfRange { index: 0, len: 0 }));
        assert_eq!(seq.iter().count(), 0);
    }
}
