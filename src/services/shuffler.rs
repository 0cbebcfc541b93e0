//! 乱序服务
//!
//! 先对每道题的选项独立乱序，再对题目顺序乱序

use crate::models::Quiz;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// 测验乱序器
///
/// 随机源可注入，固定种子时结果可复现
pub struct Shuffler<R: Rng> {
    rng: R,
}

impl<R: Rng> Shuffler<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// 原地乱序：每题的选项各自均匀重排，然后题目整体均匀重排
    pub fn shuffle(&mut self, quiz: &mut Quiz) {
        for question in quiz.questions.iter_mut() {
            question.responses.shuffle(&mut self.rng);
        }
        quiz.questions.shuffle(&mut self.rng);

        debug!("已乱序 {} 道题目及其选项", quiz.questions.len());
    }
}

impl Shuffler<StdRng> {
    /// 使用固定种子
    pub fn from_seed(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// 使用系统熵
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    /// 有种子用种子，否则用系统熵
    pub fn from_optional_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::from_seed(seed),
            None => Self::from_entropy(),
        }
    }
}
