//! # Contract Deployment
//!
//! Records contract deployments and issues the matching pending
//! transaction. Contracts are bookkeeping entries only; no code executes
//! in the simulation.

use super::state::LedgerState;
use super::synthesizer;
use crate::error::{EngineError, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use shared_types::{
    Contract, ContractRuntime, Transaction, TxType, VerificationLevel, SIGNATURE_ALGORITHM,
};
use std::collections::BTreeMap;
use tracing::info;
use uuid::Uuid;

/// Result of a successful deployment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentReceipt {
    /// Address assigned to the contract.
    pub contract_address: String,
    /// Runtime the contract targets.
    pub runtime: ContractRuntime,
    /// Deploying address.
    pub deployer: String,
    /// Hash of the deployment transaction appended to the pending set.
    pub tx_hash: String,
}

/// Deploy a contract under one of the supported runtimes.
///
/// Fails with `UnsupportedRuntime` for anything but evm/wasm/hybrid,
/// without touching the store.
pub fn deploy_contract(
    state: &mut LedgerState,
    code: &str,
    runtime: &str,
    deployer: &str,
    now: u64,
) -> Result<DeploymentReceipt> {
    let runtime: ContractRuntime = runtime
        .parse()
        .map_err(|e: shared_types::UnknownRuntime| EngineError::UnsupportedRuntime(e.0))?;

    let contract_id = hex::encode(Sha256::digest(format!(
        "{code}{deployer}{now}{}",
        Uuid::new_v4()
    )));
    let address = format!("neo1contract{}", &contract_id[..30]);
    let code_hash = hex::encode(Sha256::digest(code));

    state.contracts.insert(
        address.clone(),
        Contract {
            address: address.clone(),
            runtime,
            deployer: deployer.to_string(),
            code_hash,
            deployed_at: now,
            tx_count: 0,
        },
    );

    let tx_hash = synthesizer::fresh_tx_hash(deployer, &address, now);
    let (evm_signature, quantum_signature, dilithium_signature) =
        synthesizer::pseudo_signatures(&tx_hash, deployer);
    let nonce = state.next_nonce(deployer);

    let mut metadata = BTreeMap::new();
    metadata.insert("contract".to_string(), address.clone());
    metadata.insert("runtime".to_string(), runtime.as_str().to_string());

    let mut tx = Transaction {
        hash: tx_hash.clone(),
        sender: deployer.to_string(),
        recipient: address.clone(),
        amount: 0.0,
        gas_price: state.rng.gen_range(10.0..100.0),
        gas_used: state.rng.gen_range(21_000..=500_000),
        tx_type: TxType::ContractDeploy,
        timestamp: now,
        nonce,
        evm_signature,
        quantum_signature,
        dilithium_signature,
        signature_algorithm: SIGNATURE_ALGORITHM.to_string(),
        is_verified: false,
        verification_level: VerificationLevel::Hybrid,
        is_fraud: false,
        fraud_score: 0.0,
        metadata,
    };
    tx.verify_hybrid_signature();

    state.stats.total_transactions += 1;
    state.stats.hybrid_signatures_verified += 1;
    state.stats.quantum_signatures_verified += 1;
    state.pending_transactions.push(tx);

    info!(
        "[poi-contracts] {} deployed by {} ({})",
        address,
        deployer,
        runtime.as_str()
    );

    Ok(DeploymentReceipt {
        contract_address: address,
        runtime,
        deployer: deployer.to_string(),
        tx_hash,
    })
}
