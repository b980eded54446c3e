//! 隨機重試式的 Secret Santa 配對引擎。
//!
//! 每一輪把名單洗牌成候選池，依原始順序替每位 giver 從合法候選中隨機挑一位，
//! 挑中的人從池中移除。若某位 giver 已無合法候選，整輪作廢重來；超過嘗試上限
//! 就回報 [`AssignmentExhaustedError`]，不會回傳部分結果。
//!
//! 引擎不區分「限制可滿足但運氣不好」與「限制根本無解」，兩者都在用完嘗試次數後
//! 以同一個錯誤結束。

use crate::core::events::{DrawEvent, DrawObserver};
use crate::domain::model::{Assignment, Participant, PriorAssignments};
use rand::rngs::StdRng;
use rand::seq::{IndexedRandom, SliceRandom};
use rand::{Rng, SeedableRng};
use thiserror::Error;

pub const DEFAULT_MAX_ATTEMPTS: usize = 1000;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Assignment not possible due to constraints after {max_attempts} attempts")]
pub struct AssignmentExhaustedError {
    pub max_attempts: usize,
}

/// 單輪結果：完成，或卡在某位沒有合法候選的 giver
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    Complete(Assignment),
    DeadEnd { giver: String },
}

/// 回傳 `pool` 中 `giver` 可以抽到的索引：排除自己與上一輪抽到的人
pub fn legal_receivers(
    giver: &Participant,
    pool: &[&Participant],
    prior: &PriorAssignments,
) -> Vec<usize> {
    let previous = prior.receiver_for(giver.name());

    pool.iter()
        .enumerate()
        .filter(|(_, candidate)| {
            candidate.name() != giver.name() && Some(candidate.name()) != previous
        })
        .map(|(idx, _)| idx)
        .collect()
}

pub struct AssignmentEngine<R: Rng> {
    rng: R,
}

impl AssignmentEngine<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_os_rng() -> Self {
        Self::new(StdRng::from_os_rng())
    }

    pub fn from_seed_option(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_os_rng(),
        }
    }
}

impl<R: Rng> AssignmentEngine<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// 跑一輪建構。候選池只屬於這一輪
    pub fn attempt(
        &mut self,
        participants: &[Participant],
        prior: &PriorAssignments,
    ) -> AttemptOutcome {
        let mut pool: Vec<&Participant> = participants.iter().collect();
        pool.shuffle(&mut self.rng);

        let mut assignment = Assignment::with_capacity(participants.len());

        for giver in participants {
            let legal = legal_receivers(giver, &pool, prior);
            let Some(&idx) = legal.choose(&mut self.rng) else {
                return AttemptOutcome::DeadEnd {
                    giver: giver.name().to_string(),
                };
            };

            let receiver = pool.swap_remove(idx);
            assignment.record(giver.clone(), receiver.clone());
        }

        AttemptOutcome::Complete(assignment)
    }

    /// 在 `max_attempts` 次內找出合法配對。
    ///
    /// 呼叫端需保證名單非空且名字不重複；`prior` 中不在名單內的名字不會被比對到。
    pub fn generate<O>(
        &mut self,
        participants: &[Participant],
        prior: &PriorAssignments,
        max_attempts: usize,
        observer: &mut O,
    ) -> Result<Assignment, AssignmentExhaustedError>
    where
        O: DrawObserver + ?Sized,
    {
        let mut last_failure: Option<String> = None;

        for attempt in 1..=max_attempts {
            match self.attempt(participants, prior) {
                AttemptOutcome::Complete(assignment) if assignment.len() == participants.len() => {
                    observer.on_event(&DrawEvent::AttemptFinished {
                        attempt,
                        succeeded: true,
                    });
                    observer.on_event(&DrawEvent::Succeeded {
                        total_attempts: attempt,
                    });
                    return Ok(assignment);
                }
                AttemptOutcome::Complete(assignment) => {
                    last_failure = Some(format!(
                        "only {} of {} givers were assigned",
                        assignment.len(),
                        participants.len()
                    ));
                }
                AttemptOutcome::DeadEnd { giver } => {
                    last_failure = Some(format!("no legal receiver left for '{}'", giver));
                }
            }

            observer.on_event(&DrawEvent::AttemptFinished {
                attempt,
                succeeded: false,
            });
        }

        observer.on_event(&DrawEvent::Exhausted {
            max_attempts,
            reason: last_failure.unwrap_or_else(|| "no attempts were made".to_string()),
        });

        Err(AssignmentExhaustedError { max_attempts })
    }
}
