//! Break-even success rate for a two-outcome offensive play.
//!
//! Given the situation before the play, after a success, and after a failure,
//! the statistic from the selected table gives:
//!
//!   risk   = value(current) − value(failure)
//!   reward = value(success) + immediate runs − value(current)
//!
//! and the break-even success rate is `risk / (risk + reward)`. Above that
//! rate the play raises the offense's expected statistic; below it, the
//! downside outweighs the upside.

use serde::Serialize;
use tracing::debug;

use crate::error::{OffsitError, Result};
use crate::situation::{GameState, SituationTables, TableKind};

/// Outcome of a break-even calculation
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum BreakEven {
    /// Minimum success probability (0.0–1.0) at which the play is worth attempting
    Probability(f64),
    /// Even a success leaves the offense worse off than not attempting the play
    NegativeValue,
}

/// A break-even result together with the table values that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Calculation {
    pub kind: TableKind,
    pub current: GameState,
    pub success: GameState,
    pub failure: GameState,
    pub immediate_runs: u32,
    pub current_value: f64,
    /// Table value of the success state; `None` when a run scoring in
    /// score-probability mode made the lookup unnecessary
    pub success_table_value: Option<f64>,
    /// Includes immediate runs in run-expectancy mode
    pub success_value: f64,
    pub failure_value: f64,
    /// current − failure
    pub risk: f64,
    /// success − current
    pub reward: f64,
    pub outcome: BreakEven,
}

/// Compute the break-even success rate for a play.
///
/// # Arguments
/// * `tables`         – Situation tables built from historical data.
/// * `current`        – State before the play (0–2 outs).
/// * `success`        – State if the play succeeds (0–2 outs).
/// * `failure`        – State if the play fails (0–3 outs, or the inning-over marker).
/// * `immediate_runs` – Runs that score on the play itself.
/// * `kind`           – Which statistic to break even on.
///
/// A failure that ends the inning is worth exactly zero and is never looked up.
/// In score-probability mode a run scoring on the play makes the success
/// value 1.0 regardless of the table.
///
/// When the failure state is worth more than the current one (negative risk)
/// and reward is non-negative, the play has no downside and the result is
/// `Probability(0.0)` rather than the raw ratio, which would fall outside [0, 1].
///
/// Returns [`OffsitError::Indeterminate`] when risk and reward are both zero,
/// and propagates table lookup errors unchanged.
pub fn compute_break_even(
    tables: &SituationTables,
    current: GameState,
    success: GameState,
    failure: GameState,
    immediate_runs: u32,
    kind: TableKind,
) -> Result<Calculation> {
    let table = tables.table(kind);

    let success_table_value = match kind {
        TableKind::ScoreProbability if immediate_runs >= 1 => None,
        _ => Some(table.lookup(&success)?),
    };
    let success_value = match (kind, success_table_value) {
        (_, None) => 1.0,
        (TableKind::ScoreProbability, Some(v)) => v,
        (TableKind::RunExpectancy, Some(v)) => v + immediate_runs as f64,
    };
    let current_value = table.lookup(&current)?;
    let failure_value = if failure.is_inning_over() {
        0.0
    } else {
        table.lookup(&failure)?
    };

    let risk = current_value - failure_value;
    let reward = success_value - current_value;
    debug!(
        "{:?}: current={:.4} success={:.4} failure={:.4} risk={:.4} reward={:.4}",
        kind, current_value, success_value, failure_value, risk, reward
    );

    let outcome = break_even_from(risk, reward)?;

    Ok(Calculation {
        kind,
        current,
        success,
        failure,
        immediate_runs,
        current_value,
        success_table_value,
        success_value,
        failure_value,
        risk,
        reward,
        outcome,
    })
}

fn break_even_from(risk: f64, reward: f64) -> Result<BreakEven> {
    if reward < 0.0 {
        return Ok(BreakEven::NegativeValue);
    }
    if risk == 0.0 && reward == 0.0 {
        return Err(OffsitError::Indeterminate);
    }
    if risk <= 0.0 {
        // Failing is no worse than standing pat: any success rate pays off
        return Ok(BreakEven::Probability(0.0));
    }
    Ok(BreakEven::Probability(risk / (risk + reward)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::situation::table::{all_states, PlateAppearance};
    use crate::situation::BaseState;
    use approx::assert_relative_eq;

    /// Approximate D1 baseball run-expectancy / scoring-probability values.
    fn re_rp(bases: BaseState, outs: u8) -> (f64, f64) {
        let (re, rp) = match bases {
            BaseState::Empty => ([0.55, 0.29, 0.11], [0.30, 0.17, 0.07]),
            BaseState::First => ([0.93, 0.55, 0.24], [0.45, 0.29, 0.13]),
            BaseState::Second => ([1.17, 0.71, 0.34], [0.63, 0.42, 0.23]),
            BaseState::Third => ([1.43, 0.98, 0.38], [0.85, 0.67, 0.27]),
            BaseState::FirstSecond => ([1.55, 0.96, 0.46], [0.64, 0.43, 0.23]),
            BaseState::FirstThird => ([1.84, 1.21, 0.53], [0.88, 0.66, 0.29]),
            BaseState::SecondThird => ([2.05, 1.45, 0.60], [0.87, 0.70, 0.28]),
            BaseState::Loaded => ([2.35, 1.60, 0.79], [0.88, 0.68, 0.33]),
            BaseState::InningOver => unreachable!(),
        };
        (re[outs as usize], rp[outs as usize])
    }

    /// Two records per state: one worth 2×RE runs, one worth zero, so the
    /// run-expectancy mean is RE. Score probability is built separately.
    fn tables() -> SituationTables {
        let mut re_records = Vec::new();
        let mut rp_records = Vec::new();
        for state in all_states() {
            let (re, rp) = re_rp(state.bases, state.outs);
            re_records.push(PlateAppearance {
                bases: state.bases,
                outs: state.outs,
                runs_after: 2.0 * re,
                scored: true,
            });
            re_records.push(PlateAppearance {
                bases: state.bases,
                outs: state.outs,
                runs_after: 0.0,
                scored: false,
            });
            // 100 records, round(rp * 100) of which scored
            let scored = (rp * 100.0).round() as usize;
            for i in 0..100 {
                rp_records.push(PlateAppearance {
                    bases: state.bases,
                    outs: state.outs,
                    runs_after: 0.0,
                    scored: i < scored,
                });
            }
        }
        SituationTables {
            run_expectancy: SituationTables::build(&re_records).run_expectancy,
            score_probability: SituationTables::build(&rp_records).score_probability,
        }
    }

    fn gs(bases: BaseState, outs: u8) -> GameState {
        GameState::new(bases, outs)
    }

    #[test]
    fn test_steal_second_run_expectancy() {
        let calc = compute_break_even(
            &tables(),
            gs(BaseState::First, 0),
            gs(BaseState::Second, 0),
            gs(BaseState::Empty, 1),
            0,
            TableKind::RunExpectancy,
        )
        .unwrap();

        // risk = 0.93 - 0.29 = 0.64, reward = 1.17 - 0.93 = 0.24
        assert_relative_eq!(calc.risk, 0.64, epsilon = 1e-9);
        assert_relative_eq!(calc.reward, 0.24, epsilon = 1e-9);
        match calc.outcome {
            BreakEven::Probability(p) => {
                assert_relative_eq!(p, 0.64 / 0.88, epsilon = 1e-9);
                assert!((0.0..=1.0).contains(&p));
            }
            other => panic!("expected probability, got {:?}", other),
        }
    }

    #[test]
    fn test_steal_second_score_probability() {
        let calc = compute_break_even(
            &tables(),
            gs(BaseState::First, 0),
            gs(BaseState::Second, 0),
            gs(BaseState::Empty, 1),
            0,
            TableKind::ScoreProbability,
        )
        .unwrap();

        // risk = 0.45 - 0.17 = 0.28, reward = 0.63 - 0.45 = 0.18
        match calc.outcome {
            BreakEven::Probability(p) => {
                assert_relative_eq!(p, 0.28 / 0.46, epsilon = 1e-9);
                assert!((0.0..=1.0).contains(&p));
            }
            other => panic!("expected probability, got {:?}", other),
        }
    }

    #[test]
    fn test_sacrifice_bunt_is_negative_value() {
        // Runner on 1st, 0 out → runner on 2nd, 1 out loses run expectancy
        let calc = compute_break_even(
            &tables(),
            gs(BaseState::First, 0),
            gs(BaseState::Second, 1),
            gs(BaseState::First, 1),
            0,
            TableKind::RunExpectancy,
        )
        .unwrap();
        assert_eq!(calc.outcome, BreakEven::NegativeValue);
        assert_relative_eq!(calc.current_value, 0.93, epsilon = 1e-9);
        assert_relative_eq!(calc.success_value, 0.71, epsilon = 1e-9);
    }

    #[test]
    fn test_third_out_failure_is_zero() {
        let t = tables();
        for bases in BaseState::OCCUPANCY
            .into_iter()
            .chain([BaseState::InningOver])
        {
            let calc = compute_break_even(
                &t,
                gs(BaseState::FirstSecond, 2),
                gs(BaseState::SecondThird, 2),
                gs(bases, 3),
                0,
                TableKind::RunExpectancy,
            )
            .unwrap();
            assert_eq!(calc.failure_value, 0.0);
        }
    }

    #[test]
    fn test_inning_over_marker_skips_lookup() {
        // Marker with fewer than 3 outs still counts as inning over
        let calc = compute_break_even(
            &tables(),
            gs(BaseState::Third, 2),
            gs(BaseState::Empty, 2),
            gs(BaseState::InningOver, 2),
            1,
            TableKind::RunExpectancy,
        )
        .unwrap();
        assert_eq!(calc.failure_value, 0.0);
        // success = 0.11 + 1 run = 1.11, current = 0.38, risk = 0.38
        assert_relative_eq!(calc.success_value, 1.11, epsilon = 1e-9);
        match calc.outcome {
            BreakEven::Probability(p) => assert_relative_eq!(p, 0.38 / 1.11, epsilon = 1e-9),
            other => panic!("expected probability, got {:?}", other),
        }
    }

    #[test]
    fn test_squeeze_score_probability_short_circuits() {
        // Success lands in a state with no data: the lookup must not happen
        let sparse = SituationTables::build(&[
            PlateAppearance {
                bases: BaseState::Third,
                outs: 1,
                runs_after: 1.0,
                scored: true,
            },
            PlateAppearance {
                bases: BaseState::Third,
                outs: 1,
                runs_after: 0.0,
                scored: false,
            },
        ]);
        let calc = compute_break_even(
            &sparse,
            gs(BaseState::Third, 1),
            gs(BaseState::Empty, 2),
            gs(BaseState::Empty, 3),
            1,
            TableKind::ScoreProbability,
        )
        .unwrap();
        assert_eq!(calc.success_value, 1.0);
        assert_eq!(calc.success_table_value, None);
        // risk = 0.5, reward = 0.5
        assert_eq!(calc.outcome, BreakEven::Probability(0.5));

        // Two immediate runs still only make one run certain
        let calc = compute_break_even(
            &sparse,
            gs(BaseState::Third, 1),
            gs(BaseState::Empty, 2),
            gs(BaseState::Empty, 3),
            2,
            TableKind::ScoreProbability,
        )
        .unwrap();
        assert_eq!(calc.success_value, 1.0);
    }

    #[test]
    fn test_immediate_runs_added_in_run_expectancy() {
        let calc = compute_break_even(
            &tables(),
            gs(BaseState::Third, 1),
            gs(BaseState::Empty, 2),
            gs(BaseState::Third, 2),
            1,
            TableKind::RunExpectancy,
        )
        .unwrap();
        assert_relative_eq!(calc.success_value, 1.11, epsilon = 1e-9);
        // The stored table value is the lookup itself, not success minus runs
        assert_eq!(calc.success_table_value, Some(0.11));
    }

    #[test]
    fn test_same_success_and_current() {
        let t = tables();
        let current = gs(BaseState::Second, 1);

        // reward == 0 with positive risk: the play must always succeed
        let calc = compute_break_even(
            &t,
            current,
            current,
            gs(BaseState::Empty, 2),
            0,
            TableKind::RunExpectancy,
        )
        .unwrap();
        assert_eq!(calc.outcome, BreakEven::Probability(1.0));

        // risk == 0 and reward == 0 is undefined
        let err = compute_break_even(&t, current, current, current, 0, TableKind::RunExpectancy)
            .unwrap_err();
        assert_eq!(err, OffsitError::Indeterminate);
    }

    #[test]
    fn test_failure_better_than_current_is_free_play() {
        let calc = compute_break_even(
            &tables(),
            gs(BaseState::First, 1),
            gs(BaseState::Second, 1),
            gs(BaseState::Third, 1),
            0,
            TableKind::RunExpectancy,
        )
        .unwrap();
        assert_eq!(calc.outcome, BreakEven::Probability(0.0));
    }

    #[test]
    fn test_missing_data_propagates() {
        let sparse = SituationTables::build(&[PlateAppearance {
            bases: BaseState::First,
            outs: 0,
            runs_after: 1.0,
            scored: true,
        }]);
        let err = compute_break_even(
            &sparse,
            gs(BaseState::First, 0),
            gs(BaseState::Second, 0),
            gs(BaseState::Empty, 1),
            0,
            TableKind::RunExpectancy,
        )
        .unwrap_err();
        assert_eq!(
            err,
            OffsitError::MissingData {
                bases: BaseState::Second,
                outs: 0
            }
        );
    }

    #[test]
    fn test_current_cannot_be_inning_over() {
        let err = compute_break_even(
            &tables(),
            gs(BaseState::First, 3),
            gs(BaseState::Second, 0),
            gs(BaseState::Empty, 1),
            0,
            TableKind::RunExpectancy,
        )
        .unwrap_err();
        assert_eq!(err, OffsitError::NotATableKey(gs(BaseState::First, 3)));
    }

    #[test]
    fn test_deterministic() {
        let t = tables();
        let run = || {
            compute_break_even(
                &t,
                gs(BaseState::FirstSecond, 0),
                gs(BaseState::SecondThird, 1),
                gs(BaseState::Second, 1),
                0,
                TableKind::ScoreProbability,
            )
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_break_even_from_bounds() {
        assert_eq!(break_even_from(0.5, -0.01).unwrap(), BreakEven::NegativeValue);
        assert_eq!(break_even_from(0.0, 0.3).unwrap(), BreakEven::Probability(0.0));
        assert_eq!(break_even_from(-0.2, 0.2).unwrap(), BreakEven::Probability(0.0));
        assert_eq!(break_even_from(0.0, 0.0), Err(OffsitError::Indeterminate));
        assert_eq!(break_even_from(0.3, 0.0).unwrap(), BreakEven::Probability(1.0));
    }
}
