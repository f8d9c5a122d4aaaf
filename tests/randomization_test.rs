use exam_engine::models::question::{Question, QuestionDetails};
use exam_engine::services::randomization_service::{RandomizationOptions, RandomizationService};
use exam_engine::utils::seed::variant_seed;

fn mcq(id: i32, question: &str, options: &[&str], correct: i32) -> Question {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "type": "mcq",
        "question": question,
        "options": options,
        "correctAnswer": correct,
        "marks": 1
    }))
    .expect("question fixture")
}

fn theory(id: i32, question: &str) -> Question {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "type": "theory",
        "question": question,
        "marks": 2
    }))
    .expect("question fixture")
}

fn bank() -> Vec<Question> {
    vec![
        mcq(1, "First question text", &["alpha", "beta", "gamma", "delta"], 2),
        mcq(2, "Second question text", &["one", "two", "three"], 0),
        mcq(3, "Third question text", &["left", "right"], 1),
        theory(4, "Explain the fourth topic"),
        mcq(5, "Fifth question text", &["north", "south", "east", "west"], 3),
    ]
}

fn full_shuffle() -> RandomizationOptions {
    RandomizationOptions {
        randomize_order: true,
        randomize_options: true,
        question_pool_size: None,
    }
}

#[test]
fn same_seed_reproduces_the_identical_variant() {
    let questions = bank();

    let first = RandomizationService::randomize(&questions, &full_shuffle(), 42);
    let second = RandomizationService::randomize(&questions, &full_shuffle(), 42);

    assert_eq!(
        serde_json::to_value(&first).expect("serialize"),
        serde_json::to_value(&second).expect("serialize")
    );
}

#[test]
fn the_canonical_bank_is_never_mutated() {
    let questions = bank();
    let before = serde_json::to_value(&questions).expect("serialize");

    let _ = RandomizationService::randomize(&questions, &full_shuffle(), 7);

    let after = serde_json::to_value(&questions).expect("serialize");
    assert_eq!(before, after);
    assert!(questions.iter().all(|q| q.randomized_order.is_none()));
}

#[test]
fn pool_size_larger_than_the_bank_returns_everything() {
    let questions = bank();
    let options = RandomizationOptions {
        randomize_order: false,
        randomize_options: false,
        question_pool_size: Some(50),
    };

    let variant = RandomizationService::randomize(&questions, &options, 11);

    assert_eq!(variant.len(), questions.len());
    assert_eq!(
        variant.iter().map(|q| q.id).collect::<Vec<_>>(),
        vec![1, 2, 3, 4, 5]
    );
}

#[test]
fn pool_sampling_draws_a_subset_before_ordering() {
    let questions = bank();
    let options = RandomizationOptions {
        randomize_order: false,
        randomize_options: false,
        question_pool_size: Some(2),
    };

    let variant = RandomizationService::randomize(&questions, &options, 123);

    assert_eq!(variant.len(), 2);
    let ids: Vec<i32> = variant.iter().map(|q| q.id).collect();
    assert!(ids.iter().all(|id| (1..=5).contains(id)));
    assert_ne!(ids[0], ids[1]);
}

#[test]
fn option_shuffle_keeps_the_correct_text_and_remembers_the_old_index() {
    let questions = bank();
    let options = RandomizationOptions {
        randomize_order: false,
        randomize_options: true,
        question_pool_size: None,
    };

    for seed in [1u64, 2, 3, 99, 1000] {
        let variant = RandomizationService::randomize(&questions, &options, seed);

        for (original, shuffled) in questions.iter().zip(variant.iter()) {
            let (QuestionDetails::Mcq(before), QuestionDetails::Mcq(after)) =
                (&original.details, &shuffled.details)
            else {
                continue;
            };

            let old_index = before.correct_answer.expect("fixture has an answer");
            let new_index = after.correct_answer.expect("shuffled answer");
            assert_eq!(
                after.options[new_index as usize],
                before.options[old_index as usize]
            );
            assert_eq!(after.original_correct_answer, Some(old_index));

            let mut sorted_before = before.options.clone();
            let mut sorted_after = after.options.clone();
            sorted_before.sort();
            sorted_after.sort();
            assert_eq!(sorted_before, sorted_after);
        }
    }
}

#[test]
fn non_mcq_questions_pass_through_option_shuffling() {
    let questions = vec![theory(1, "Explain the only topic")];
    let options = RandomizationOptions {
        randomize_order: false,
        randomize_options: true,
        question_pool_size: None,
    };

    let variant = RandomizationService::randomize(&questions, &options, 5);

    assert!(matches!(variant[0].details, QuestionDetails::Theory(_)));
    assert_eq!(variant[0].question, "Explain the only topic");
}

#[test]
fn annotations_record_new_and_original_positions() {
    let questions = bank();

    let variant = RandomizationService::randomize(&questions, &full_shuffle(), 77);

    assert_eq!(variant.len(), questions.len());
    for (pos, q) in variant.iter().enumerate() {
        assert_eq!(q.randomized_order, Some(pos as i32));
        let expected = questions
            .iter()
            .position(|orig| orig.id == q.id)
            .map(|p| p as i32)
            .expect("every variant id exists in the bank");
        assert_eq!(q.original_index, Some(expected));
    }
}

#[test]
fn missing_ids_recover_as_original_index_minus_one() {
    let without_id: Question = serde_json::from_value(serde_json::json!({
        "type": "theory",
        "question": "An unidentified question"
    }))
    .expect("question fixture");
    let questions = vec![without_id, theory(9, "An identified question")];
    let options = RandomizationOptions::default();

    let variant = RandomizationService::randomize(&questions, &options, 3);

    assert_eq!(variant[0].original_index, Some(-1));
    assert_eq!(variant[1].original_index, Some(1));
}

#[test]
fn variant_helper_derives_the_seed_from_exam_and_student() {
    let questions = bank();
    let options = full_shuffle();

    let by_ids = RandomizationService::variant(&questions, &options, "exam-1", "alice");
    let again = RandomizationService::variant(&questions, &options, "exam-1", "alice");
    let by_seed =
        RandomizationService::randomize(&questions, &options, variant_seed("exam-1", "alice"));

    let as_value = |qs: &[Question]| serde_json::to_value(qs).expect("serialize");
    assert_eq!(as_value(&by_ids), as_value(&again));
    assert_eq!(as_value(&by_ids), as_value(&by_seed));
}
