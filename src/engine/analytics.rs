use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;

use crate::models::analytics::responses::{
    AnalyticsSummary, LabelCount, QuestionAnalytics, WordFrequency,
};
use crate::models::student_responses::entities::QuestionAnswer;
use crate::models::surveys::entities::{QuestionDetail, QuestionType};

/// 词云保留的最大词数
pub const MAX_WORDS: usize = 50;

// 长度不超过该值的词被丢弃
const MIN_WORD_CHARS: usize = 2;

static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and",
        "any", "are", "as", "at", "be", "because", "been", "before", "being", "below",
        "between", "both", "but", "by", "can", "could", "did", "do", "does", "doing", "down",
        "during", "each", "few", "for", "from", "further", "had", "has", "have", "having", "he",
        "her", "here", "hers", "herself", "him", "himself", "his", "how", "i", "if", "in",
        "into", "is", "it", "its", "itself", "just", "me", "more", "most", "my", "myself", "no",
        "nor", "not", "now", "of", "off", "on", "once", "only", "or", "other", "our", "ours",
        "ourselves", "out", "over", "own", "same", "she", "should", "so", "some", "such",
        "than", "that", "the", "their", "theirs", "them", "themselves", "then", "there",
        "these", "they", "this", "those", "through", "to", "too", "under", "until", "up",
        "very", "was", "we", "were", "what", "when", "where", "which", "while", "who", "whom",
        "why", "will", "with", "would", "you", "your", "yours", "yourself", "yourselves",
    ]
    .into_iter()
    .collect()
});

/// 按题目汇总已提交的答案
///
/// 结果保持题目顺序，没有任何有效作答的题目不会出现。
pub fn aggregate(questions: &[QuestionDetail], answers: &[QuestionAnswer]) -> Vec<QuestionAnalytics> {
    let mut by_question: HashMap<i64, Vec<&QuestionAnswer>> = HashMap::new();
    for answer in answers {
        by_question.entry(answer.question_id).or_default().push(answer);
    }

    questions
        .iter()
        .filter_map(|question| {
            let rows = by_question
                .get(&question.id())
                .map(Vec::as_slice)
                .unwrap_or(&[]);
            let summary = summarize(question, rows)?;
            Some(QuestionAnalytics {
                question_id: question.id(),
                question_text: question.question.question_text.clone(),
                question_type: question.question_type(),
                summary,
            })
        })
        .collect()
}

fn summarize(question: &QuestionDetail, rows: &[&QuestionAnswer]) -> Option<AnalyticsSummary> {
    match question.question_type() {
        QuestionType::MultipleChoice | QuestionType::Likert => {
            let counts: Vec<LabelCount> = question
                .options
                .iter()
                .map(|option| LabelCount {
                    label: option.option_text.clone(),
                    count: rows
                        .iter()
                        .filter(|a| a.selected_option_id == Some(option.id))
                        .count() as i64,
                })
                .collect();
            tally(counts)
        }
        QuestionType::TrueFalse => {
            let count = |value: bool| {
                rows.iter()
                    .filter(|a| a.true_false_answer == Some(value))
                    .count() as i64
            };
            tally(vec![
                LabelCount {
                    label: "True".to_string(),
                    count: count(true),
                },
                LabelCount {
                    label: "False".to_string(),
                    count: count(false),
                },
            ])
        }
        QuestionType::Essay | QuestionType::Enumeration => {
            let texts: Vec<&str> = rows
                .iter()
                .filter_map(|a| a.text_answer.as_deref())
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .collect();
            if texts.is_empty() {
                return None;
            }
            Some(AnalyticsSummary::WordCloud {
                response_count: texts.len() as i64,
                words: word_frequencies(&texts),
            })
        }
        QuestionType::Heading | QuestionType::Subheading | QuestionType::Paragraph => None,
    }
}

fn tally(counts: Vec<LabelCount>) -> Option<AnalyticsSummary> {
    if counts.iter().all(|c| c.count == 0) {
        None
    } else {
        Some(AnalyticsSummary::Tally { counts })
    }
}

/// 统计词频
///
/// 转小写后按空白切分，去掉首尾标点、停用词和过短的词。
/// 按次数降序取前 `MAX_WORDS` 个，次数相同时保持首次出现的顺序。
pub fn word_frequencies(texts: &[&str]) -> Vec<WordFrequency> {
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, i64> = HashMap::new();

    for text in texts {
        let lowered = text.to_lowercase();
        for raw in lowered.split_whitespace() {
            let word = raw.trim_matches(|c: char| !c.is_alphanumeric());
            if word.chars().count() <= MIN_WORD_CHARS || STOP_WORDS.contains(word) {
                continue;
            }
            let entry = counts.entry(word.to_string()).or_insert(0);
            if *entry == 0 {
                order.push(word.to_string());
            }
            *entry += 1;
        }
    }

    let mut words: Vec<WordFrequency> = order
        .into_iter()
        .map(|word| {
            let size = counts.get(&word).copied().unwrap_or(0);
            WordFrequency { word, size }
        })
        .collect();
    // 稳定排序，保证同频词的出现顺序
    words.sort_by(|a, b| b.size.cmp(&a.size));
    words.truncate(MAX_WORDS);
    words
}
