//! # Transaction Synthesizer
//!
//! Produces synthetic transactions, optionally attack-flavored, with
//! deterministic feature extraction for training-data export.
//!
//! Every synthesized transaction gets the sender's next nonce, three
//! hash-derived pseudo-signatures and a structural verification flag. The
//! signature step is fabrication, not cryptography; see
//! `Transaction::verify_hybrid_signature`.

use super::state::LedgerState;
use rand::distributions::WeightedIndex;
use rand::prelude::*;
use sha2::{Digest, Sha256, Sha512};
use shared_types::{
    AttackPattern, AttackType, Transaction, TxType, VerificationLevel, SIGNATURE_ALGORITHM,
};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Categorical distribution over normal transaction types.
const TYPE_WEIGHTS: [(TxType, f64); 5] = [
    (TxType::Transfer, 0.6),
    (TxType::ContractCall, 0.2),
    (TxType::Stake, 0.1),
    (TxType::Unstake, 0.05),
    (TxType::Governance, 0.05),
];

const ATTACK_TYPES: [AttackType; 4] = [
    AttackType::FlashLoan,
    AttackType::Reentrancy,
    AttackType::Sandwich,
    AttackType::Dust,
];

/// Fabricate the hybrid pseudo-signature triple for a transaction.
///
/// All three are hash digests over tagged preimages; a UUID salts the
/// quantum and dilithium layers so repeated submissions differ.
pub(crate) fn pseudo_signatures(tx_hash: &str, sender: &str) -> (String, String, String) {
    let evm = hex::encode(Sha256::digest(format!("evm:{tx_hash}:{sender}")));
    let quantum = hex::encode(Sha256::digest(format!(
        "ed25519:{tx_hash}:{sender}:{}",
        Uuid::new_v4()
    )));
    let dilithium = hex::encode(Sha512::digest(format!(
        "dilithium3:{tx_hash}:{sender}:{}",
        Uuid::new_v4()
    )));
    (evm, quantum, dilithium)
}

/// Derive a fresh transaction hash from its endpoints plus entropy.
pub(crate) fn fresh_tx_hash(sender: &str, recipient: &str, now: u64) -> String {
    hex::encode(Sha256::digest(format!(
        "{sender}{recipient}{now}{}",
        Uuid::new_v4()
    )))
}

/// Synthesize one transaction and record its side effects on the store.
///
/// Normal mode draws sender/recipient from current balance holders and the
/// type from the fixed categorical distribution, with a 2% baseline fraud
/// rate. Attack mode draws from the reserved attacker identity pool, is
/// always fraudulent and is appended to the bounded attack-pattern log.
pub fn synthesize(state: &mut LedgerState, is_attack: bool, now: u64) -> Transaction {
    let mut metadata = BTreeMap::new();

    let (sender, recipient, tx_type, amount, gas_price, is_fraud, fraud_score, attack_type) =
        if is_attack {
            let attack_type = ATTACK_TYPES[state.rng.gen_range(0..ATTACK_TYPES.len())];
            let attacker_id: u32 = state.rng.gen_range(1..=100);
            let sender = format!("neo1attacker{attacker_id:03}");
            let validator_idx = state.rng.gen_range(0..state.validators.len());
            let recipient = state
                .validators
                .keys()
                .nth(validator_idx)
                .expect("validators initialized at genesis")
                .clone();
            let amount = match attack_type {
                AttackType::FlashLoan => state.rng.gen_range(1_000_000.0..10_000_000.0),
                _ => state.rng.gen_range(0.001..0.01),
            };
            let gas_price = state.rng.gen_range(1_000.0..10_000.0);
            let fraud_score = state.rng.gen_range(0.7..0.99);
            metadata.insert("attack_type".to_string(), attack_type.as_str().to_string());
            (
                sender,
                recipient,
                TxType::ContractCall,
                amount,
                gas_price,
                true,
                fraud_score,
                Some(attack_type),
            )
        } else {
            let sender_idx = state.rng.gen_range(0..state.balances.len());
            let sender = state
                .balances
                .keys()
                .nth(sender_idx)
                .expect("balances seeded at genesis")
                .clone();
            // Recipient differs from sender whenever another holder exists.
            let recipients: Vec<&String> =
                state.balances.keys().filter(|k| **k != sender).collect();
            let recipient = if recipients.is_empty() {
                sender.clone()
            } else {
                recipients[state.rng.gen_range(0..recipients.len())].clone()
            };

            let weights = WeightedIndex::new(TYPE_WEIGHTS.iter().map(|(_, w)| *w))
                .expect("type weights are positive");
            let tx_type = TYPE_WEIGHTS[weights.sample(&mut state.rng)].0;

            let amount = state.rng.gen_range(0.1..1_000.0);
            let gas_price = state.rng.gen_range(10.0..100.0);
            let is_fraud = state.rng.gen_bool(state.config.base_fraud_rate);
            let fraud_score = if is_fraud {
                state.rng.gen_range(0.6..0.9)
            } else {
                state.rng.gen_range(0.0..0.3)
            };
            metadata.insert("tx_type".to_string(), tx_type.as_str().to_string());
            (
                sender, recipient, tx_type, amount, gas_price, is_fraud, fraud_score, None,
            )
        };

    let hash = fresh_tx_hash(&sender, &recipient, now);
    let (evm_signature, quantum_signature, dilithium_signature) =
        pseudo_signatures(&hash, &sender);
    let nonce = state.next_nonce(&sender);

    let mut tx = Transaction {
        hash,
        sender,
        recipient,
        amount,
        gas_price,
        gas_used: state.rng.gen_range(21_000..=500_000),
        tx_type,
        timestamp: now,
        nonce,
        evm_signature,
        quantum_signature,
        dilithium_signature,
        signature_algorithm: SIGNATURE_ALGORITHM.to_string(),
        is_verified: false,
        verification_level: VerificationLevel::Hybrid,
        is_fraud,
        fraud_score,
        metadata,
    };
    tx.verify_hybrid_signature();

    state.stats.total_transactions += 1;
    state.stats.hybrid_signatures_verified += 1;
    state.stats.quantum_signatures_verified += 1;
    if is_fraud {
        state.stats.fraud_detected += 1;
    }
    if let Some(attack_type) = attack_type {
        state.record_attack(AttackPattern {
            attack_type,
            tx_hash: tx.hash.clone(),
            timestamp: tx.timestamp,
            amount: tx.amount,
        });
    }

    tx
}
