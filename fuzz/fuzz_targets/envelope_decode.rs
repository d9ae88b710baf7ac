//! Random-bytes fuzzer for envelope decoding and dispatch
//!
//! Arbitrary transaction bytes must never panic the decoder, and anything
//! that does decode must dispatch to either a rejection or exactly one
//! state change.

#![no_main]

use libfuzzer_sys::fuzz_target;
use spyglass_core::{MessageProtocol, storage::MemoryStorage};
use spyglass_proto::{Envelope, PrincipalId};

fuzz_target!(|data: &[u8]| {
    let Ok(envelope) = Envelope::decode(data) else {
        return;
    };

    let protocol = MessageProtocol::new();
    let storage = MemoryStorage::new();

    // Seed a master so recruitment paths are reachable
    let master = PrincipalId::from_bytes([0xAA; 32]);
    if let Ok(actions) = protocol.assign_authority(&master, &storage) {
        for action in &actions {
            action.apply(&storage).expect("memory storage apply");
        }
    }

    let before = storage.snapshot();
    match protocol.dispatch(&envelope.sender, &envelope.call, &storage) {
        Ok(actions) => assert_eq!(actions.len(), 1, "accepted call must yield one action"),
        Err(err) => {
            assert!(err.is_rejection(), "memory storage never fails: {}", err);
            assert_eq!(storage.snapshot(), before, "rejection mutated state");
        },
    }
});
