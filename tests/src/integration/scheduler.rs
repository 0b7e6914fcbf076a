//! # Scheduler Lifecycle Flows
//!
//! Exercises the engine's background loops under tokio's paused clock:
//! blocks accumulate over virtual time, the trainer eventually runs, and
//! shutdown drains both loops promptly.

#[cfg(test)]
mod tests {
    use poi_engine::{EngineConfig, PoiEngine};
    use std::time::Duration;

    fn fast_engine(seed: u64) -> PoiEngine {
        PoiEngine::new(EngineConfig {
            rng_seed: Some(seed),
            ai_score_threshold: -1.0,
            block_interval_secs: 1,
            training_interval_secs: 5,
            ..EngineConfig::default()
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_block_loop_advances_the_chain() {
        let engine = fast_engine(201);
        engine.start();

        tokio::time::sleep(Duration::from_secs(10)).await;
        engine.stop().await;

        let stats = engine.network_stats();
        assert!(stats.block_height > 1, "loop never committed a block");
        assert!(stats.total_transactions > 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_training_loop_runs_once_data_accumulates() {
        let engine = fast_engine(202);
        engine.start();

        // 30 virtual seconds: ~30 blocks of 10-50 transactions each is
        // comfortably past the 50-sample training minimum.
        tokio::time::sleep(Duration::from_secs(30)).await;
        engine.stop().await;

        let status = engine.ai_status();
        assert!(status.training_rounds >= 1, "trainer never ran");
        assert!(status.accuracy > 0.75);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_is_prompt_and_final() {
        let engine = fast_engine(203);
        engine.start();
        tokio::time::sleep(Duration::from_secs(3)).await;

        tokio::time::timeout(Duration::from_secs(5), engine.stop())
            .await
            .expect("stop resolves promptly");

        // No loop survives the shutdown signal.
        let height = engine.network_stats().block_height;
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(engine.network_stats().block_height, height);
    }

    #[tokio::test]
    async fn test_engine_clones_share_one_ledger() {
        let engine = fast_engine(204);
        let clone = engine.clone();

        engine.produce_block();
        assert_eq!(
            engine.network_stats().block_height,
            clone.network_stats().block_height
        );
    }
}
