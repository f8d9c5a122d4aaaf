use exam_engine::models::question::{QuestionDetails, QuestionType};
use exam_engine::services::parser_service::{ParseFormat, ParserService};

fn parser() -> ParserService {
    ParserService::new("python".to_string())
}

#[test]
fn csv_rows_map_types_options_and_marks() {
    let text = "Type,Question,Option1,Option2,Option3,Option4,Answer,Marks\n\
                MCQ,Capital of France?,Paris,London,Berlin,Madrid,0,2\n\
                Coding,Reverse a string,,,,,,3\n\
                Theory,Explain ACID properties,,,,,,5\n";

    let questions = parser().parse(text, ParseFormat::Csv).expect("parse csv");

    assert_eq!(questions.len(), 3);
    assert_eq!(
        questions.iter().map(|q| q.id).collect::<Vec<_>>(),
        vec![1, 2, 3]
    );

    assert_eq!(questions[0].question_type, QuestionType::Mcq);
    assert_eq!(questions[0].marks, Some(2.0));
    let QuestionDetails::Mcq(mc) = &questions[0].details else {
        panic!("expected MCQ details");
    };
    assert_eq!(mc.options, vec!["Paris", "London", "Berlin", "Madrid"]);
    assert_eq!(mc.correct_answer, Some(0));

    assert_eq!(questions[1].question_type, QuestionType::Coding);
    assert_eq!(questions[1].marks, Some(3.0));
    let QuestionDetails::Coding(cd) = &questions[1].details else {
        panic!("expected coding details");
    };
    assert_eq!(cd.language.as_deref(), Some("python"));

    assert_eq!(questions[2].question_type, QuestionType::Theory);
    assert_eq!(questions[2].marks, Some(5.0));
}

#[test]
fn csv_non_numeric_last_column_defaults_marks_to_one() {
    let text = "theory,Describe the water cycle\n\
                mcq,Pick an option,A,B,C,D,unknown\n";

    let questions = parser().parse(text, ParseFormat::Csv).expect("parse csv");

    assert_eq!(questions.len(), 2);
    assert!(questions.iter().all(|q| q.marks == Some(1.0)));
    // A non-numeric answer column falls back to index 0.
    let QuestionDetails::Mcq(mc) = &questions[1].details else {
        panic!("expected MCQ details");
    };
    assert_eq!(mc.correct_answer, Some(0));
}

#[test]
fn template_answer_letter_maps_to_zero_based_index() {
    let text = "Q1. Which planet is known as the red planet?\n\
                a) Venus\n\
                b) Mercury\n\
                c) Mars\n\
                d) Jupiter\n\
                Answer: c\n";

    let questions = parser()
        .parse(text, ParseFormat::Template)
        .expect("parse template");

    assert_eq!(questions.len(), 1);
    let QuestionDetails::Mcq(mc) = &questions[0].details else {
        panic!("expected MCQ details");
    };
    assert_eq!(mc.options.len(), 4);
    assert_eq!(mc.correct_answer, Some(2));
    assert_eq!(questions[0].marks, Some(1.0));
}

#[test]
fn template_coding_block_extracts_language_starter_and_marks() {
    let text = "Q1. Implement a stack [CODING]\n\
                Language: rust\n\
                Marks: 4\n\
                ```rust\n\
                struct Stack;\n\
                ```\n";

    let questions = parser()
        .parse(text, ParseFormat::Template)
        .expect("parse template");

    assert_eq!(questions.len(), 1);
    assert_eq!(questions[0].question, "Implement a stack");
    assert_eq!(questions[0].marks, Some(4.0));
    let QuestionDetails::Coding(cd) = &questions[0].details else {
        panic!("expected coding details");
    };
    assert_eq!(cd.language.as_deref(), Some("rust"));
    assert_eq!(cd.starter_code.as_deref(), Some("struct Stack;"));
    assert!(cd.test_cases.is_empty());
}

#[test]
fn template_coding_block_without_language_leaves_it_unset() {
    let questions = parser()
        .parse("Q1. Sort a list of numbers [CODING]\n", ParseFormat::Template)
        .expect("parse template");

    let QuestionDetails::Coding(cd) = &questions[0].details else {
        panic!("expected coding details");
    };
    assert_eq!(cd.language, None);
}

#[test]
fn template_mixed_blocks_keep_their_markers_apart() {
    let text = "Q1. What does CPU stand for? [MCQ]\n\
                a) Central Processing Unit\n\
                b) Computer Personal Unit\n\
                Answer: a\n\
                Q2. Explain virtual memory [THEORY]\n\
                Marks: 5\n";

    let questions = parser()
        .parse(text, ParseFormat::Template)
        .expect("parse template");

    assert_eq!(questions.len(), 2);
    assert_eq!(questions[0].question_type, QuestionType::Mcq);
    assert_eq!(questions[0].question, "What does CPU stand for?");
    assert_eq!(questions[1].question_type, QuestionType::Theory);
    assert_eq!(questions[1].question, "Explain virtual memory");
    assert_eq!(questions[1].marks, Some(5.0));
}

#[test]
fn json_array_normalizes_loose_type_labels_and_drops_stray_fields() {
    let text = r#"[
        {"type": "multiple_choice", "question": "What is 2+2?", "options": ["3", "4"], "correctAnswer": 1, "marks": 2},
        {"type": "theory", "question": "Explain integer overflow", "options": ["stray", "options"]}
    ]"#;

    let questions = parser().parse(text, ParseFormat::Json).expect("parse json");

    assert_eq!(questions.len(), 2);
    assert_eq!(questions[0].question_type, QuestionType::Mcq);
    let QuestionDetails::Mcq(mc) = &questions[0].details else {
        panic!("expected MCQ details");
    };
    assert_eq!(mc.correct_answer, Some(1));

    // A theory record with stray options must never look like an MCQ again.
    assert_eq!(questions[1].question_type, QuestionType::Theory);
    assert!(matches!(questions[1].details, QuestionDetails::Theory(_)));
    let value = serde_json::to_value(&questions[1]).expect("serialize");
    assert!(value.get("options").is_none());
}

#[test]
fn json_object_wraps_into_a_single_question() {
    let text = r#"{"type": "mcq", "question": "Pick one option", "options": ["x", "y"], "correctAnswer": 0}"#;

    let questions = parser().parse(text, ParseFormat::Json).expect("parse json");

    assert_eq!(questions.len(), 1);
    assert_eq!(questions[0].id, 1);
}

#[test]
fn malformed_json_is_a_hard_error() {
    assert!(parser().parse("{not valid json", ParseFormat::Json).is_err());
    assert!(parser().parse("42", ParseFormat::Json).is_err());
}

#[test]
fn smart_numbered_list_collects_options_and_answers() {
    let text = "1. What is the capital of France?\n\
                A) London\n\
                B) Paris\n\
                Answer: B\n\
                \n\
                2) Explain the role of RAM in short\n";

    let questions = parser().parse(text, ParseFormat::Smart).expect("parse smart");

    assert_eq!(questions.len(), 2);
    let QuestionDetails::Mcq(mc) = &questions[0].details else {
        panic!("expected MCQ details");
    };
    assert_eq!(mc.options, vec!["London", "Paris"]);
    assert_eq!(mc.correct_answer, Some(1));
    assert_eq!(questions[1].question_type, QuestionType::Theory);
    assert_eq!(questions[1].question, "Explain the role of RAM in short");
}

#[test]
fn smart_code_fence_turns_the_question_into_coding() {
    let text = "1. Reverse a linked list\n```\ndef reverse(head):\n    pass\n```\n";

    let questions = parser().parse(text, ParseFormat::Smart).expect("parse smart");

    assert_eq!(questions.len(), 1);
    assert_eq!(questions[0].question_type, QuestionType::Coding);
    let QuestionDetails::Coding(cd) = &questions[0].details else {
        panic!("expected coding details");
    };
    assert_eq!(cd.starter_code.as_deref(), Some("def reverse(head):\n    pass"));
    assert_eq!(cd.language.as_deref(), Some("python"));
    assert!(cd.test_cases.is_empty());
}

#[test]
fn smart_keyword_in_the_question_forces_coding() {
    let questions = parser()
        .parse("1. Write a function that sorts an array\n", ParseFormat::Smart)
        .expect("parse smart");

    assert_eq!(questions.len(), 1);
    assert_eq!(questions[0].question_type, QuestionType::Coding);
    let QuestionDetails::Coding(cd) = &questions[0].details else {
        panic!("expected coding details");
    };
    assert_eq!(cd.language.as_deref(), Some("python"));
    assert_eq!(cd.starter_code, None);
}

#[test]
fn smart_numeric_answer_is_taken_as_is() {
    let text = "1. Pick the second entry\n\
                a) first\n\
                b) second\n\
                c) third\n\
                Answer: 1\n";

    let questions = parser().parse(text, ParseFormat::Smart).expect("parse smart");

    let QuestionDetails::Mcq(mc) = &questions[0].details else {
        panic!("expected MCQ details");
    };
    assert_eq!(mc.correct_answer, Some(1));
}

#[test]
fn auto_detection_routes_each_input_shape() {
    let p = parser();

    assert_eq!(
        p.detect_format(r#"[{"type": "theory", "question": "Why?"}]"#),
        ParseFormat::Json
    );
    assert_eq!(
        p.detect_format("mcq,First question text,A,B,C,D,0,1\nmcq,Second question text,A,B,C,D,1,1"),
        ParseFormat::Csv
    );
    assert_eq!(p.detect_format("Q1. What is a pointer?"), ParseFormat::Template);
    assert_eq!(
        p.detect_format("Describe your favorite data structure"),
        ParseFormat::Smart
    );
}
