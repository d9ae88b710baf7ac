//! Scenario tests demonstrating oracle patterns on the spy network.

use spyglass_core::Rejection;
use spyglass_harness::{
    KeyRing, LedgerConfig,
    scenario::{OracleFn, Scenario, oracle},
};
use spyglass_proto::{AgentId, SpyMessage};

#[test]
fn unrecruited_agent_is_turned_away() {
    let bond = KeyRing::new().next_principal();

    let result = Scenario::new()
        .submit_message(bond, SpyMessage::new(7, 1, 123_456_789_012, 69420))
        .oracle(oracle::last_rejected_with(Rejection::AgentNotRegistered))
        .run();

    assert_eq!(result, Ok(()));
}

#[test]
fn master_recruits_and_bond_reports() {
    let mut keys = KeyRing::new();
    let m = keys.next_principal();
    let bond = keys.next_principal();

    let result = Scenario::new()
        .assign_authority(m)
        .produce_block()
        .register_agent(m, 7, 69420)
        .produce_block()
        .submit_message(bond, SpyMessage::new(7, 1, 123_456_789_012, 69420))
        .oracle(oracle::all_of(vec![
            oracle::all_accepted(),
            oracle::authority_is(m),
            oracle::last_sequence_is(AgentId::new(7), 1),
        ]))
        .run();

    assert_eq!(result, Ok(()));
}

#[test]
fn replay_is_rejected_and_counter_holds() {
    let mut keys = KeyRing::new();
    let m = keys.next_principal();
    let bond = keys.next_principal();
    let message = SpyMessage::new(7, 1, 123_456_789_012, 69420);

    let result = Scenario::new()
        .assign_authority(m)
        .register_agent(m, 7, 69420)
        .submit_message(bond, message)
        .produce_block()
        .submit_message(bond, message)
        .oracle(oracle::all_of(vec![
            oracle::last_rejected_with(Rejection::StaleOrDuplicateSequenceNumber),
            oracle::last_sequence_is(AgentId::new(7), 1),
        ]))
        .run();

    assert_eq!(result, Ok(()));
}

#[test]
fn next_message_after_replay_is_accepted() {
    let mut keys = KeyRing::new();
    let m = keys.next_principal();
    let bond = keys.next_principal();
    let first = SpyMessage::new(7, 1, 123_456_789_012, 69420);

    let one_rejection: OracleFn = Box::new(|world| {
        if world.rejected_count() == 1 {
            Ok(())
        } else {
            Err(format!("expected exactly one rejection, got {}", world.rejected_count()))
        }
    });

    let result = Scenario::new()
        .assign_authority(m)
        .register_agent(m, 7, 69420)
        .submit_message(bond, first)
        .submit_message(bond, first)
        .submit_message(bond, SpyMessage::new(7, 2, 133_333_789_012, 69420))
        .oracle(oracle::all_of(vec![
            oracle::last_accepted(),
            oracle::last_sequence_is(AgentId::new(7), 2),
            one_rejection,
        ]))
        .run();

    assert_eq!(result, Ok(()));
}

#[test]
fn wrong_code_leaves_counter_unchanged() {
    let mut keys = KeyRing::new();
    let m = keys.next_principal();
    let bond = keys.next_principal();

    let result = Scenario::new()
        .assign_authority(m)
        .register_agent(m, 7, 69420)
        .submit_message(bond, SpyMessage::new(7, 1, 123_456_789_012, 69421))
        .oracle(oracle::all_of(vec![
            oracle::last_rejected_with(Rejection::SecretMismatch),
            oracle::last_sequence_is(AgentId::new(7), 0),
        ]))
        .run();

    assert_eq!(result, Ok(()));
}

#[test]
fn garbage_transaction_does_not_disturb_state() {
    let m = KeyRing::new().next_principal();

    let decode_failure: OracleFn = Box::new(|world| {
        let receipt = world.last_receipt().ok_or("missing receipt")?;
        match (&receipt.status_message, receipt.sender) {
            (Some(message), None) if message.contains("CBOR") => Ok(()),
            other => Err(format!("unexpected receipt: {:?}", other)),
        }
    });

    let result = Scenario::new()
        .assign_authority(m)
        .submit_raw(vec![0xde, 0xad, 0xbe, 0xef])
        .oracle(oracle::all_of(vec![oracle::authority_is(m), decode_failure]))
        .run();

    assert_eq!(result, Ok(()));
}

#[test]
fn failing_oracle_reports_reason() {
    let m = KeyRing::new().next_principal();

    let result = Scenario::new()
        .assign_authority(m)
        .assign_authority(m)
        .oracle(oracle::all_accepted())
        .run();

    let err = result.expect_err("second assignment must fail the oracle");
    assert!(err.contains("transaction 1 was rejected"));
    assert!(err.contains("There can be only one master"));
}

#[test]
fn small_blocks_spread_transactions() {
    let m = KeyRing::new().next_principal();
    let config = LedgerConfig { max_transactions_per_block: 1, ..LedgerConfig::default() };

    let result = Scenario::new()
        .with_config(config)
        .assign_authority(m)
        .register_agent(m, 1, 1)
        .register_agent(m, 2, 2)
        .oracle(Box::new(|world| {
            if world.blocks().len() == 3 && world.accepted_count() == 3 {
                Ok(())
            } else {
                Err(format!("got {} blocks", world.blocks().len()))
            }
        }))
        .run();

    assert_eq!(result, Ok(()));
}
