use std::collections::HashMap;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use quizgrade_core::grading::grade;
use quizgrade_core::model::{Answer, AttemptPolicy, Lesson, LessonKind, Question, QuestionKind};
use quizgrade_core::normalize::normalize;
use quizgrade_core::report::grade_lesson;

fn contains_question(keywords: usize, min_words: u32) -> Question {
    Question {
        id: "bench".into(),
        prompt: "Write a paragraph".into(),
        kind: QuestionKind::Contains {
            keywords: (0..keywords).map(|i| format!("keyword{i}")).collect(),
            min_words,
        },
    }
}

fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize");

    let short = "  The Quick   brown FOX ";
    let long = "Lorem  IPSUM dolor\tsit amet, ".repeat(200);

    group.bench_function("short", |b| b.iter(|| normalize(black_box(short))));
    group.bench_function("long", |b| b.iter(|| normalize(black_box(&long))));

    group.finish();
}

fn bench_grade(c: &mut Criterion) {
    let mut group = c.benchmark_group("grade");

    let multi = Question {
        id: "bench".into(),
        prompt: "Pick".into(),
        kind: QuestionKind::Multi {
            options: (0..10).map(|i| format!("Option {i}")).collect(),
            answers: (0..5).map(|i| format!("Option {i}")).collect(),
        },
    };
    let multi_answer = Answer::Choices((0..5).rev().map(|i| format!("option {i}")).collect());
    group.bench_function("multi_5_of_10", |b| {
        b.iter(|| grade(black_box(&multi), black_box(Some(&multi_answer))))
    });

    let essay: String = (0..20).map(|i| format!("keyword{i} filler text ")).collect();
    let essay = Answer::Text(essay);
    let few = contains_question(3, 10);
    let many = contains_question(20, 50);
    group.bench_function("contains_3_keywords", |b| {
        b.iter(|| grade(black_box(&few), black_box(Some(&essay))))
    });
    group.bench_function("contains_20_keywords", |b| {
        b.iter(|| grade(black_box(&many), black_box(Some(&essay))))
    });

    group.finish();
}

fn bench_grade_lesson(c: &mut Criterion) {
    let questions: Vec<Question> = (0..50)
        .map(|i| Question {
            id: format!("q{i}"),
            prompt: format!("Question {i}"),
            kind: QuestionKind::Exact {
                answer: format!("Answer number {i}"),
            },
        })
        .collect();
    let answers: HashMap<String, Answer> = (0..50)
        .map(|i| (format!("q{i}"), Answer::Text(format!("answer  NUMBER {i}"))))
        .collect();
    let lesson = Lesson {
        id: "bench".into(),
        title: "Bench".into(),
        description: String::new(),
        kind: LessonKind::Exam,
        take_policy: AttemptPolicy::unlimited(),
        questions,
    };

    c.bench_function("grade_lesson_50_exact", |b| {
        b.iter(|| grade_lesson(black_box(&lesson), black_box(&answers)))
    });
}

criterion_group!(benches, bench_normalize, bench_grade, bench_grade_lesson);
criterion_main!(benches);
