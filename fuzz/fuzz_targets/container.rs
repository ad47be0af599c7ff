#![no_main]
use libfuzzer_sys::fuzz_target;

use classwrite::{AttributeBlock, ClassVersion, Container, ContainerConfig};

fuzz_target!(|data: &[u8]| {
    let config = match data.first() {
        Some(b) if b & 1 == 1 => ContainerConfig::class_file(ClassVersion::JAVA_17),
        _ => ContainerConfig::default(),
    };
    let mut container = Container::with_config(config);
    for chunk in data.chunks(7) {
        let (name, payload) = chunk.split_at(chunk.len().min(2));
        let name = String::from_utf8_lossy(name);
        let Ok(name) = container.pool_mut().utf8(&name) else {
            return;
        };
        if let Ok(block) = AttributeBlock::new(name, payload.to_vec()) {
            container.add_block(block).unwrap();
        }
    }
    let expected = container.encoded_length();
    let bytes = container.to_vec().unwrap();
    assert_eq!(bytes.len(), expected);
});
