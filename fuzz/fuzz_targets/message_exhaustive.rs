//! Exhaustive edge-value fuzzer for message submission
//!
//! Input bytes pick a combination of edge values for every message field
//! and every stored agent state, so libFuzzer walks the whole cross product
//! of the validation pipeline instead of sampling it.

#![no_main]

use libfuzzer_sys::fuzz_target;
use spyglass_core::{
    AgentRecord, MessageProtocol, ProtocolAction, Rejection,
    storage::{MemoryStorage, Storage},
};
use spyglass_proto::{AgentId, MAX_PAYLOAD, MIN_PAYLOAD, SharedSecret, SpyMessage};

const U64_EDGES: &[u64] = &[0, 1, 69420, u32::MAX as u64, u64::MAX / 2, u64::MAX - 1, u64::MAX];

const PAYLOAD_EDGES: &[u64] = &[
    0,
    MIN_PAYLOAD - 1,
    MIN_PAYLOAD,
    MIN_PAYLOAD + 1,
    MAX_PAYLOAD - 1,
    MAX_PAYLOAD,
    MAX_PAYLOAD + 1,
    u64::MAX,
];

fuzz_target!(|data: &[u8]| {
    if data.len() < 5 {
        return;
    }

    let agent_id = AgentId::new(U64_EDGES[data[0] as usize % U64_EDGES.len()]);
    let stored_code = SharedSecret::new(U64_EDGES[data[1] as usize % U64_EDGES.len()]);
    let sent_code = SharedSecret::new(U64_EDGES[data[2] as usize % U64_EDGES.len()]);
    let last_sequence = U64_EDGES[data[3] as usize % U64_EDGES.len()];
    let recruited = data[4] & 1 == 1;

    let storage = MemoryStorage::new();
    if recruited {
        let record = AgentRecord { security_code: stored_code, last_sequence_number: last_sequence };
        storage.store_agent(agent_id, &record).expect("memory storage store");
    }

    let protocol = MessageProtocol::new();

    for &sequence_number in U64_EDGES {
        for &payload in PAYLOAD_EDGES {
            let message = SpyMessage {
                agent_id,
                sequence_number,
                payload,
                security_code: sent_code,
            };

            let expected = if !recruited {
                Some(Rejection::AgentNotRegistered)
            } else if sent_code != stored_code {
                Some(Rejection::SecretMismatch)
            } else if payload < MIN_PAYLOAD {
                Some(Rejection::MessageTooShort)
            } else if payload > MAX_PAYLOAD {
                Some(Rejection::MessageTooLong)
            } else if sequence_number <= last_sequence {
                Some(Rejection::StaleOrDuplicateSequenceNumber)
            } else {
                None
            };

            match (protocol.submit_message(&message, &storage), expected) {
                (Err(err), Some(rejection)) => {
                    assert_eq!(err.rejection(), Some(rejection), "wrong precedence for {:?}", message);
                },
                (Ok(actions), None) => {
                    let record = AgentRecord {
                        security_code: stored_code,
                        last_sequence_number: sequence_number,
                    };
                    assert_eq!(actions, vec![ProtocolAction::StoreAgent { agent_id, record }]);
                },
                (result, expected) => {
                    panic!("message {:?}: expected {:?}, got {:?}", message, expected, result)
                },
            }
        }
    }
});
