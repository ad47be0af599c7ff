#![no_main]
use libfuzzer_sys::fuzz_target;

use classwrite::{ByteWriter, ConstantPool, Encodable, PoolLimits};

// Beliebige Strings interniert: Indizes stabil, Ausgabe so lang wie angekündigt.
fuzz_target!(|data: &[u8]| {
    let max_index = u16::from(data.first().copied().unwrap_or(1)).max(1);
    let Ok(limits) = PoolLimits::with_max_index(max_index) else {
        return;
    };
    let mut pool = ConstantPool::with_limits(limits);
    let mut refs = Vec::new();
    for chunk in data.split(|&b| b == b'|') {
        let text = String::from_utf8_lossy(chunk);
        let result = match chunk.first() {
            Some(b'L') => pool.long(chunk.len() as i64),
            Some(b'C') => pool.class(&text),
            _ => pool.utf8(&text),
        };
        if let Ok(reference) = result {
            refs.push(reference);
        }
    }
    let indices: Vec<_> = refs.iter().map(|r| r.resolve()).collect();
    let expected = pool.encoded_length();
    let mut writer = ByteWriter::new();
    pool.write_all(&mut writer).unwrap();
    assert_eq!(writer.position(), expected);
    for (reference, index) in refs.iter().zip(indices) {
        assert_eq!(reference.resolve(), index);
        assert_eq!(reference.encoded_length(), 2);
    }
});
