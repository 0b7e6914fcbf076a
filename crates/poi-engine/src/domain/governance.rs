//! # Governance Engine
//!
//! DAO-style proposals with an AI-weighted vote: human stake votes carry
//! 70% of the decision, the keyword-derived AI recommendation carries 30%
//! scaled by its confidence.
//!
//! Resolution is re-evaluated after every vote. Proposals below quorum
//! stay active indefinitely, even past their voting deadline; this matches
//! the network's historical behavior and is pinned by a test below.

use super::state::LedgerState;
use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use shared_types::{
    AiRecommendation, Proposal, ProposalStatus, AI_VOTE_WEIGHT, VOTING_PERIOD_SECS,
};
use tracing::{debug, info};

/// Keywords that push the AI recommendation towards `For`.
const POSITIVE_KEYWORDS: [&str; 5] = ["upgrade", "improve", "security", "efficiency", "reward"];

/// Keywords that push the AI recommendation towards `Against`.
const NEGATIVE_KEYWORDS: [&str; 5] = ["remove", "decrease", "attack", "exploit", "drain"];

/// Fraction of total active stake required before a proposal can resolve.
const QUORUM_FRACTION: f64 = 0.1;

/// Outcome of a single vote, returned to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteReceipt {
    /// Proposal voted on.
    pub proposal_id: String,
    /// Voting address.
    pub voter: String,
    /// True for a vote in favor.
    pub support: bool,
    /// Stake weight applied.
    pub weight: f64,
    /// Running total in favor after this vote.
    pub for_votes: f64,
    /// Running total against after this vote.
    pub against_votes: f64,
    /// Proposal status after re-evaluating resolution.
    pub status: ProposalStatus,
}

/// Scan title and description for the fixed keyword sets.
///
/// The majority side becomes the recommendation with confidence
/// `min(0.9, 0.5 + 0.1 * keywordCount)`; ties yield `Neutral` at 0.5.
pub fn analyze_proposal(title: &str, description: &str) -> (AiRecommendation, f64) {
    let text = format!("{title} {description}").to_lowercase();

    let positive = POSITIVE_KEYWORDS.iter().filter(|kw| text.contains(**kw)).count();
    let negative = NEGATIVE_KEYWORDS.iter().filter(|kw| text.contains(**kw)).count();

    if positive > negative {
        (
            AiRecommendation::For,
            (0.5 + 0.1 * positive as f64).min(0.9),
        )
    } else if negative > positive {
        (
            AiRecommendation::Against,
            (0.5 + 0.1 * negative as f64).min(0.9),
        )
    } else {
        (AiRecommendation::Neutral, 0.5)
    }
}

/// Create a proposal and store it as `Active`.
pub fn create_proposal(
    state: &mut LedgerState,
    title: &str,
    description: &str,
    proposer: &str,
    now: u64,
) -> Proposal {
    let digest = Sha256::digest(format!("{title}{proposer}{now}"));
    let id = hex::encode(digest)[..16].to_string();

    let (ai_recommendation, ai_confidence) = analyze_proposal(title, description);

    let proposal = Proposal {
        id: id.clone(),
        title: title.to_string(),
        description: description.to_string(),
        proposer: proposer.to_string(),
        created_at: now,
        voting_ends_at: now + VOTING_PERIOD_SECS,
        status: ProposalStatus::Active,
        for_votes: 0.0,
        against_votes: 0.0,
        ai_recommendation,
        ai_confidence,
        ai_weight: AI_VOTE_WEIGHT,
    };

    info!(
        "[poi-governance] proposal {} created by {}: recommendation={:?}, confidence={:.2}",
        id, proposer, ai_recommendation, ai_confidence
    );

    state.proposals.insert(id, proposal.clone());
    state.stats.dao_proposals += 1;
    proposal
}

/// Cast a stake-weighted vote and re-evaluate resolution.
///
/// Fails with `ProposalNotFound` for unknown ids and `ProposalNotActive`
/// once the proposal has resolved; neither failure mutates any proposal.
pub fn vote(
    state: &mut LedgerState,
    proposal_id: &str,
    voter: &str,
    support: bool,
    stake_weight: f64,
) -> Result<VoteReceipt> {
    let quorum = state.active_validator_stake() * QUORUM_FRACTION;

    let proposal = state
        .proposals
        .get_mut(proposal_id)
        .ok_or_else(|| EngineError::ProposalNotFound(proposal_id.to_string()))?;

    if proposal.status != ProposalStatus::Active {
        return Err(EngineError::ProposalNotActive(proposal_id.to_string()));
    }

    if support {
        proposal.for_votes += stake_weight;
    } else {
        proposal.against_votes += stake_weight;
    }

    check_resolution(proposal, quorum);

    Ok(VoteReceipt {
        proposal_id: proposal_id.to_string(),
        voter: voter.to_string(),
        support,
        weight: stake_weight,
        for_votes: proposal.for_votes,
        against_votes: proposal.against_votes,
        status: proposal.status,
    })
}

/// Resolve a proposal once quorum is met.
///
/// `weightedFor = humanFor * 0.7 + aiFor * 0.3 * confidence`, where the AI
/// stance maps to 1.0 (for), 0.0 (against) or 0.5 (neutral). Below quorum
/// the proposal stays active.
fn check_resolution(proposal: &mut Proposal, quorum: f64) {
    let total_votes = proposal.for_votes + proposal.against_votes;
    if total_votes == 0.0 || total_votes < quorum {
        return;
    }

    let human_for = proposal.for_votes / total_votes;
    let ai_for = match proposal.ai_recommendation {
        AiRecommendation::For => 1.0,
        AiRecommendation::Against => 0.0,
        AiRecommendation::Neutral => 0.5,
    };
    let human_ratio = 1.0 - proposal.ai_weight;
    let weighted_for = human_for * human_ratio + ai_for * proposal.ai_weight * proposal.ai_confidence;

    proposal.status = if weighted_for > 0.5 {
        ProposalStatus::Passed
    } else {
        ProposalStatus::Rejected
    };
    debug!(
        "[poi-governance] proposal {} resolved: weighted_for={:.3} -> {:?}",
        proposal.id, weighted_for, proposal.status
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use shared_types::Validator;

    const NOW: u64 = 1_700_000_000;

    fn seeded_state(seed: u64) -> LedgerState {
        let config = EngineConfig {
            rng_seed: Some(seed),
            ..EngineConfig::default()
        };
        LedgerState::new(config, NOW)
    }

    /// State with a single validator staking 1000, so quorum is exactly 100.
    fn state_with_quorum_100() -> LedgerState {
        let mut state = seeded_state(1);
        state.validators.clear();
        state.validators.insert(
            "neo1validator00".to_string(),
            Validator {
                address: "neo1validator00".to_string(),
                stake: 1_000.0,
                is_active: true,
                blocks_validated: 0,
                rewards_earned: 0.0,
                intelligence_score: 0.9,
                registered_at: NOW,
            },
        );
        state
    }

    #[test]
    fn test_keyword_analysis_positive() {
        let (rec, conf) = analyze_proposal("Upgrade network security", "improve efficiency");
        assert_eq!(rec, AiRecommendation::For);
        // upgrade, security, improve, efficiency -> 0.5 + 0.4
        assert!((conf - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_keyword_analysis_negative() {
        let (rec, conf) = analyze_proposal("Remove staking", "decrease validator set");
        assert_eq!(rec, AiRecommendation::Against);
        assert!((conf - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_keyword_analysis_tie_is_neutral() {
        let (rec, conf) = analyze_proposal("upgrade then remove", "");
        assert_eq!(rec, AiRecommendation::Neutral);
        assert_eq!(conf, 0.5);
    }

    #[test]
    fn test_confidence_is_capped_at_090() {
        let (_, conf) =
            analyze_proposal("upgrade improve security efficiency reward", "all of them");
        assert!((conf - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_proposal_id_is_short_hash() {
        let mut state = seeded_state(2);
        let proposal = create_proposal(&mut state, "Title", "Body", "neo1alice", NOW);
        assert_eq!(proposal.id.len(), 16);
        assert_eq!(proposal.status, ProposalStatus::Active);
        assert_eq!(proposal.voting_ends_at, NOW + VOTING_PERIOD_SECS);
        assert_eq!(state.stats.dao_proposals, 1);
    }

    #[test]
    fn test_worked_resolution_example_passes() {
        // forVotes=70, againstVotes=30, recommendation=For, confidence=0.8:
        // weightedFor = 0.7*0.7 + 1.0*0.3*0.8 = 0.73 > 0.5 at quorum 100.
        let mut state = state_with_quorum_100();
        let proposal = create_proposal(&mut state, "Upgrade", "a", "neo1alice", NOW);
        {
            let p = state.proposals.get_mut(&proposal.id).unwrap();
            p.ai_recommendation = AiRecommendation::For;
            p.ai_confidence = 0.8;
        }

        vote(&mut state, &proposal.id, "neo1v1", true, 70.0).unwrap();
        let receipt = vote(&mut state, &proposal.id, "neo1v2", false, 30.0).unwrap();
        assert_eq!(receipt.status, ProposalStatus::Passed);
    }

    #[test]
    fn test_resolution_rejects_on_hostile_recommendation() {
        // humanFor = 0.5; ai Against contributes nothing:
        // weightedFor = 0.5*0.7 = 0.35 <= 0.5.
        let mut state = state_with_quorum_100();
        let proposal = create_proposal(&mut state, "Drain the treasury", "exploit", "neo1eve", NOW);
        assert_eq!(proposal.ai_recommendation, AiRecommendation::Against);

        vote(&mut state, &proposal.id, "neo1v1", true, 50.0).unwrap();
        let receipt = vote(&mut state, &proposal.id, "neo1v2", false, 50.0).unwrap();
        assert_eq!(receipt.status, ProposalStatus::Rejected);
    }

    #[test]
    fn test_vote_on_unknown_proposal_is_not_found_and_mutates_nothing() {
        let mut state = state_with_quorum_100();
        let proposal = create_proposal(&mut state, "Title", "Body", "neo1alice", NOW);

        let err = vote(&mut state, "deadbeefdeadbeef", "neo1v1", true, 10.0).unwrap_err();
        assert!(matches!(err, EngineError::ProposalNotFound(_)));

        let stored = &state.proposals[&proposal.id];
        assert_eq!(stored.for_votes, 0.0);
        assert_eq!(stored.against_votes, 0.0);
        assert_eq!(stored.status, ProposalStatus::Active);
    }

    #[test]
    fn test_vote_on_resolved_proposal_is_invalid_state() {
        let mut state = state_with_quorum_100();
        let proposal = create_proposal(&mut state, "Upgrade security", "x", "neo1alice", NOW);
        vote(&mut state, &proposal.id, "neo1v1", true, 200.0).unwrap();
        assert_eq!(
            state.proposals[&proposal.id].status,
            ProposalStatus::Passed
        );

        let err = vote(&mut state, &proposal.id, "neo1v2", false, 500.0).unwrap_err();
        assert!(matches!(err, EngineError::ProposalNotActive(_)));
        // Status is never reversed.
        assert_eq!(state.proposals[&proposal.id].status, ProposalStatus::Passed);
    }

    #[test]
    fn test_below_quorum_stays_active_past_deadline() {
        let mut state = state_with_quorum_100();
        let proposal = create_proposal(&mut state, "Title", "Body", "neo1alice", NOW);

        // 40 < quorum of 100: no resolution, even though the voting
        // deadline has long passed by the time anyone looks again.
        vote(&mut state, &proposal.id, "neo1v1", true, 40.0).unwrap();
        let stored = &state.proposals[&proposal.id];
        assert_eq!(stored.status, ProposalStatus::Active);
        assert!(stored.voting_ends_at < NOW + VOTING_PERIOD_SECS + 1);
    }
}
