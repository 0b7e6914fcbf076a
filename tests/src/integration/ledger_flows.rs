//! # Ledger Integration Flows
//!
//! End-to-end flows through the engine's public API: block production and
//! chain linkage, the mining reward pool, governance resolution, contract
//! deployment, and the auto-trainer. Every test pins the RNG seed so the
//! synthetic traffic is reproducible.

#[cfg(test)]
mod tests {
    use poi_engine::{EngineConfig, EngineError, ErrorKind, PoiEngine, MINING_POOL_REWARDS};
    use shared_types::{ProposalStatus, TxType};

    /// Engine that commits every candidate block, deterministically.
    fn accepting_engine(seed: u64) -> PoiEngine {
        PoiEngine::new(EngineConfig {
            rng_seed: Some(seed),
            ai_score_threshold: -1.0,
            ..EngineConfig::default()
        })
    }

    /// Engine that rejects every candidate block.
    fn rejecting_engine(seed: u64) -> PoiEngine {
        PoiEngine::new(EngineConfig {
            rng_seed: Some(seed),
            ai_score_threshold: 1.1,
            ..EngineConfig::default()
        })
    }

    // =========================================================================
    // BLOCK PRODUCTION
    // =========================================================================

    #[test]
    fn test_chain_grows_and_links_across_blocks() {
        let engine = accepting_engine(101);
        for _ in 0..10 {
            engine.produce_block();
        }

        // Accessor returns newest first; walk it oldest-first for linkage.
        let mut blocks = engine.recent_blocks(100);
        blocks.reverse();
        assert_eq!(blocks.len(), 11); // genesis + 10

        for pair in blocks.windows(2) {
            assert_eq!(pair[1].previous_hash, pair[0].hash);
            assert_eq!(pair[1].index, pair[0].index + 1);
        }

        let stats = engine.network_stats();
        assert_eq!(stats.block_height, 11);
        assert_eq!(stats.attacks_prevented, 0);
        assert!(stats.total_transactions >= 100); // at least 10 per block
    }

    #[test]
    fn test_rejected_blocks_leave_no_trace_on_the_chain() {
        let engine = rejecting_engine(102);
        let before = engine.network_stats();

        for _ in 0..5 {
            engine.produce_block();
        }

        let stats = engine.network_stats();
        assert_eq!(stats.block_height, before.block_height);
        assert_eq!(stats.attacks_prevented, 5);
        assert_eq!(engine.recent_blocks(100).len(), 1); // genesis only
    }

    #[test]
    fn test_snapshot_is_idempotent_between_mutations() {
        let engine = accepting_engine(103);
        engine.produce_block();
        assert_eq!(engine.network_stats(), engine.network_stats());

        engine.produce_block();
        assert_eq!(engine.network_stats(), engine.network_stats());
    }

    // =========================================================================
    // MINING REWARDS
    // =========================================================================

    #[test]
    fn test_full_miner_lifecycle() {
        let engine = accepting_engine(104);
        engine
            .register_miner("neo1workbench", 16, 32_768, Some("http://10.0.0.7:9000"))
            .unwrap();

        let mut paid = 0.0;
        for i in 0..5 {
            let receipt = engine
                .submit_task_result("neo1workbench", &format!("task-{i}"), 0.9, 1.0)
                .unwrap();
            paid += receipt.reward;
        }

        // Pool conservation: everything paid out is still accounted for.
        let stats = engine.network_stats();
        assert!(
            (engine.mining_pool_balance() + stats.mining_rewards_distributed
                - MINING_POOL_REWARDS)
                .abs()
                < 1e-6
        );
        assert!((engine.balance("neo1workbench") - paid).abs() < 1e-9);
        assert_eq!(stats.ai_tasks_completed, 5);

        // Reward transactions sit in the pending set until the next block.
        let pending = engine.pending_transactions();
        assert_eq!(
            pending
                .iter()
                .filter(|tx| tx.tx_type == TxType::MiningReward)
                .count(),
            5
        );

        // The next committed block carries them.
        let block = engine.produce_block();
        for tx in &pending {
            assert!(block.transactions.iter().any(|t| t.hash == tx.hash));
        }
        assert!(engine.pending_transactions().is_empty());
    }

    #[test]
    fn test_duplicate_miner_registration_rejected() {
        let engine = accepting_engine(105);
        engine.register_miner("neo1m", 4, 8_192, None).unwrap();

        let err = engine.register_miner("neo1m", 4, 8_192, None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidState);
    }

    #[test]
    fn test_unknown_miner_submission_is_not_found() {
        let engine = accepting_engine(106);
        let err = engine
            .submit_task_result("neo1ghost", "task", 0.5, 1.0)
            .unwrap_err();
        assert!(matches!(err, EngineError::MinerNotFound(_)));
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    // =========================================================================
    // GOVERNANCE
    // =========================================================================

    #[test]
    fn test_proposal_resolves_through_the_engine() {
        let engine = accepting_engine(107);
        let total_stake: f64 = engine.validators().iter().map(|v| v.stake).sum();

        let proposal =
            engine.create_proposal("Upgrade network security", "hybrid rollout", "neo1alice");
        assert_eq!(proposal.status, ProposalStatus::Active);
        assert_eq!(engine.network_stats().dao_proposals, 1);

        // A vote carrying the whole active stake clears quorum immediately,
        // and the favorable AI recommendation seals the pass.
        let receipt = engine
            .vote(&proposal.id, "neo1validator00", true, total_stake)
            .unwrap();
        assert_eq!(receipt.status, ProposalStatus::Passed);

        // Resolved proposals accept no further votes.
        let err = engine
            .vote(&proposal.id, "neo1validator01", false, total_stake)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidState);

        let stored = engine
            .proposals()
            .into_iter()
            .find(|p| p.id == proposal.id)
            .unwrap();
        assert_eq!(stored.status, ProposalStatus::Passed);
    }

    #[test]
    fn test_vote_on_unknown_proposal_is_not_found() {
        let engine = accepting_engine(108);
        let err = engine.vote("0000000000000000", "neo1v", true, 1.0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    // =========================================================================
    // CONTRACTS
    // =========================================================================

    #[test]
    fn test_contract_deployment_reaches_the_chain() {
        let engine = accepting_engine(109);
        let receipt = engine
            .deploy_contract("0x608060405260043610", "hybrid", "neo1deployer")
            .unwrap();
        assert!(receipt.contract_address.starts_with("neo1contract"));

        let block = engine.produce_block();
        let tx = block
            .transactions
            .iter()
            .find(|t| t.hash == receipt.tx_hash)
            .expect("deployment transaction committed");
        assert_eq!(tx.tx_type, TxType::ContractDeploy);
        assert_eq!(tx.recipient, receipt.contract_address);
    }

    #[test]
    fn test_unsupported_runtime_is_invalid_argument() {
        let engine = accepting_engine(110);
        let err = engine
            .deploy_contract("code", "solana", "neo1deployer")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    // =========================================================================
    // TRAINING
    // =========================================================================

    #[test]
    fn test_training_round_follows_block_production() {
        let engine = accepting_engine(111);
        let before = engine.ai_status();
        assert_eq!(before.training_rounds, 0);

        for _ in 0..5 {
            engine.produce_block();
        }
        engine.train_now();

        let after = engine.ai_status();
        assert_eq!(after.training_rounds, 1);
        assert!(after.accuracy > before.accuracy);
        assert!(after.accuracy <= 0.99);

        // Validator intelligence stays in its band after retuning.
        for validator in engine.validators() {
            assert!(validator.intelligence_score >= 0.7);
            assert!(validator.intelligence_score <= 0.99);
        }
    }

    #[test]
    fn test_training_data_export_matches_chain_history() {
        let engine = accepting_engine(112);
        for _ in 0..3 {
            engine.produce_block();
        }

        let samples = engine.training_data(10_000);
        let chain_txs: usize = engine
            .recent_blocks(100)
            .iter()
            .map(|b| b.transactions.len())
            .sum();
        // Every committed transaction yields a sample; attack-log entries
        // may add more on top.
        assert!(samples.len() >= chain_txs);
        assert!(samples.iter().all(|s| s.features.len() == 10));
    }
}
