use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::models::question::{Question, QuestionDetails};
use crate::utils::seed::variant_seed;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RandomizationOptions {
    #[serde(default)]
    pub randomize_order: bool,
    #[serde(default)]
    pub randomize_options: bool,
    #[serde(default)]
    pub question_pool_size: Option<usize>,
}

pub struct RandomizationService;

impl RandomizationService {
    /// Builds a per-student variant from the canonical bank. The bank itself
    /// is never touched; the same seed always yields the same variant, so a
    /// reloading student sees the identical paper. One RNG threads through
    /// every shuffle and is never reseeded mid-operation.
    pub fn randomize(
        questions: &[Question],
        options: &RandomizationOptions,
        seed: u64,
    ) -> Vec<Question> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut variant: Vec<Question> = questions.to_vec();

        // Pool sampling happens before order shuffling, so the two settings
        // stay independent knobs.
        if let Some(pool_size) = options.question_pool_size {
            if pool_size < variant.len() {
                variant.shuffle(&mut rng);
                variant.truncate(pool_size);
            }
        }

        if options.randomize_order {
            variant.shuffle(&mut rng);
        }

        if options.randomize_options {
            for q in variant.iter_mut() {
                shuffle_mcq_options(q, &mut rng);
            }
        }

        for (new_pos, q) in variant.iter_mut().enumerate() {
            q.randomized_order = Some(new_pos as i32);
            q.original_index = Some(original_position(questions, q.id));
        }

        variant
    }

    pub fn variant(
        questions: &[Question],
        options: &RandomizationOptions,
        exam_id: &str,
        student_id: &str,
    ) -> Vec<Question> {
        Self::randomize(questions, options, variant_seed(exam_id, student_id))
    }
}

fn shuffle_mcq_options(q: &mut Question, rng: &mut impl rand::Rng) {
    if let QuestionDetails::Mcq(mc) = &mut q.details {
        let Some(correct) = mc.correct_answer else {
            return;
        };
        if correct < 0 || correct as usize >= mc.options.len() {
            return;
        }

        let correct_option = mc.options[correct as usize].clone();
        mc.options.shuffle(rng);
        mc.correct_answer = Some(
            mc.options
                .iter()
                .position(|o| o == &correct_option)
                .unwrap_or(0) as i32,
        );
        mc.original_correct_answer = Some(correct);
    }
}

fn original_position(original: &[Question], id: i32) -> i32 {
    if id == 0 {
        return -1;
    }
    original
        .iter()
        .position(|q| q.id == id)
        .map_or(-1, |p| p as i32)
}
