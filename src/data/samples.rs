// ============================================================
// Layer 4 — Sample Provider
// ============================================================
// The fixed list of demo passages, each with a handful of
// questions that exercise the different question categories.
//
// The built-in list is materialised once, on first use, and
// handed out as a `&'static` slice. A JSON file with the same
// shape can be used instead:
//
//   [
//     {
//       "title": "Apple Inc.",
//       "context": "Apple Inc. is ...",
//       "sample_questions": ["Where is Apple headquartered?"]
//     }
//   ]

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use rand::seq::SliceRandom;

use crate::domain::{sample::SampleQa, traits::SampleSource};

static BUILTIN: Lazy<Vec<SampleQa>> = Lazy::new(|| {
    vec![
        SampleQa::new(
            "Apple Inc.",
            "Apple Inc. is an American multinational technology company headquartered in Cupertino, California. \
             Apple is the world's largest technology company by revenue, totaling $394.3 billion in 2022. \
             As of March 2023, Apple is the world's biggest company by market capitalization. As of June 2022, \
             Apple is the fourth-largest personal computer vendor by unit sales and second-largest mobile phone \
             manufacturer in the world. It is one of the Big Five American information technology companies, \
             alongside Alphabet, Amazon, Meta, and Microsoft. Apple was founded as Apple Computer Company on \
             April 1, 1976, by Steve Wozniak, Steve Jobs and Ronald Wayne to develop and sell Wozniak's Apple I \
             personal computer. It was incorporated by Jobs and Wozniak as Apple Computer, Inc. in 1977.",
            [
                "Where is Apple headquartered?",
                "When was Apple founded?",
                "Who founded Apple?",
                "What was Apple's revenue in 2022?",
            ],
        ),
        SampleQa::new(
            "Machine Learning",
            "Machine learning is a branch of artificial intelligence and computer science which focuses on \
             the use of data and algorithms to imitate the way that humans learn, gradually improving its \
             accuracy. Machine learning is an important component of the growing field of data science. \
             Through the use of statistical methods, algorithms are trained to make classifications or \
             predictions, and to uncover key insights in data mining projects. These insights subsequently \
             drive decision making within applications and businesses. Machine learning algorithms are \
             typically created using frameworks that accelerate solution development, such as TensorFlow \
             and PyTorch.",
            [
                "What is machine learning?",
                "What frameworks are used for machine learning?",
                "What field is machine learning important to?",
                "What do machine learning algorithms do?",
            ],
        ),
        SampleQa::new(
            "Core ML",
            "Core ML is Apple's machine learning framework used across its products, including Siri, Camera, \
             and QuickType. Core ML enables developers to integrate machine learning models into iOS, iPadOS, \
             macOS, watchOS, and tvOS apps. The framework supports a variety of model types including neural \
             networks, tree ensembles, support vector machines, and generalized linear models. Core ML optimizes \
             on-device performance by leveraging the CPU, GPU, and Neural Engine while minimizing memory footprint \
             and power consumption. Models can be trained using popular machine learning tools like TensorFlow, \
             PyTorch, and Create ML, then converted to the Core ML format for integration into apps.",
            [
                "What is Core ML?",
                "Which Apple products use Core ML?",
                "What platforms does Core ML support?",
                "What model types does Core ML support?",
            ],
        ),
        SampleQa::new(
            "BERT Model",
            "BERT, which stands for Bidirectional Encoder Representations from Transformers, is a machine learning \
             model for natural language processing. It was published in 2018 by researchers at Google AI Language. \
             BERT is designed to pre-train deep bidirectional representations from unlabeled text by jointly \
             conditioning on both left and right context in all layers. The pre-trained BERT model can be fine-tuned \
             with just one additional output layer to create state-of-the-art models for a wide range of tasks, \
             such as question answering and language inference. BERT was trained on BooksCorpus and English Wikipedia. \
             The model has 340 million parameters and was trained on 16 Cloud TPUs for four days.",
            [
                "What does BERT stand for?",
                "When was BERT published?",
                "Who developed BERT?",
                "How many parameters does BERT have?",
            ],
        ),
        SampleQa::new(
            "iPhone",
            "The iPhone is a line of smartphones designed and marketed by Apple Inc. The first-generation iPhone \
             was announced by Steve Jobs on January 9, 2007. Since then, Apple has annually released new iPhone \
             models and iOS updates. The iPhone uses Apple's iOS mobile operating system. The first iPhone was \
             described as a revolutionary product that featured a multi-touch interface. The latest models feature \
             advanced camera systems, Face ID facial recognition, and the A17 Pro chip. As of November 2023, more \
             than 2.3 billion iPhones have been sold, making it one of the most successful product lines in history.",
            [
                "Who announced the first iPhone?",
                "When was the first iPhone announced?",
                "What operating system does iPhone use?",
                "How many iPhones have been sold?",
            ],
        ),
        SampleQa::new(
            "Swift Programming",
            "Swift is a general-purpose, multi-paradigm, compiled programming language developed by Apple Inc. \
             for iOS, iPadOS, macOS, watchOS, tvOS, Linux, and Windows. Swift was introduced at Apple's 2014 \
             Worldwide Developers Conference (WWDC). It was designed to work with Apple's Cocoa and Cocoa Touch \
             frameworks and the large body of existing Objective-C code written for Apple products. Swift is \
             designed to be safer than Objective-C and includes modern programming language features. The language \
             is open-source with an Apache License 2.0. Swift supports the concept of protocol extensibility, \
             an extensibility system that can be applied to types, structs and classes.",
            [
                "What is Swift?",
                "When was Swift introduced?",
                "What platforms does Swift support?",
                "Is Swift open-source?",
            ],
        ),
    ]
});

/// The built-in samples, in display order.
pub fn builtin_samples() -> &'static [SampleQa] {
    &BUILTIN
}

/// A random built-in sample.
pub fn random_sample() -> &'static SampleQa {
    let samples = builtin_samples();
    samples
        .choose(&mut rand::thread_rng())
        .unwrap_or(&samples[0])
}

/// Find a sample by 1-based index ("3") or by title, ignoring case.
pub fn find_sample<'a>(samples: &'a [SampleQa], key: &str) -> Option<&'a SampleQa> {
    let key = key.trim();
    if let Ok(n) = key.parse::<usize>() {
        return n.checked_sub(1).and_then(|i| samples.get(i));
    }
    samples
        .iter()
        .find(|s| s.title.eq_ignore_ascii_case(key))
}

// ─── Sources ──────────────────────────────────────────────────────────────────

/// The samples compiled into the binary.
pub struct BuiltinSamples;

impl SampleSource for BuiltinSamples {
    fn load_all(&self) -> Result<Vec<SampleQa>> {
        Ok(builtin_samples().to_vec())
    }
}

/// Samples read from a JSON array on disk.
pub struct JsonSampleFile {
    path: PathBuf,
}

impl JsonSampleFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SampleSource for JsonSampleFile {
    fn load_all(&self) -> Result<Vec<SampleQa>> {
        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("Cannot read samples file '{}'", self.path.display()))?;
        let samples: Vec<SampleQa> = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid samples JSON in '{}'", self.path.display()))?;
        tracing::info!("Loaded {} samples from '{}'", samples.len(), self.path.display());
        Ok(samples)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builtin_samples_are_complete() {
        let samples = builtin_samples();
        assert_eq!(samples.len(), 6);
        for s in samples {
            assert!(!s.title.is_empty());
            assert!(!s.context.is_empty());
            assert_eq!(s.sample_questions.len(), 4);
            // continuation lines join with a single space
            assert!(!s.context.contains("  "), "{}", s.title);
            assert!(!s.context.contains('\n'), "{}", s.title);
        }
    }

    #[test]
    fn test_random_sample_is_builtin() {
        let sample = random_sample();
        assert!(builtin_samples().contains(sample));
    }

    #[test]
    fn test_find_sample_by_index_and_title() {
        let samples = builtin_samples();
        assert_eq!(find_sample(samples, "1").map(|s| s.title.as_str()), Some("Apple Inc."));
        assert_eq!(find_sample(samples, "bert model").map(|s| s.title.as_str()), Some("BERT Model"));
        assert!(find_sample(samples, "0").is_none());
        assert!(find_sample(samples, "7").is_none());
        assert!(find_sample(samples, "Rust").is_none());
    }

    #[test]
    fn test_json_sample_file_round_trip() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let json = serde_json::to_string(&builtin_samples()[..2]).unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let loaded = JsonSampleFile::new(file.path()).load_all().unwrap();
        assert_eq!(loaded, builtin_samples()[..2].to_vec());
    }

    #[test]
    fn test_json_sample_questions_are_optional() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"title": "T", "context": "C."}}]"#).unwrap();

        let loaded = JsonSampleFile::new(file.path()).load_all().unwrap();
        assert!(loaded[0].sample_questions.is_empty());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = JsonSampleFile::new("/definitely/not/here.json").load_all().unwrap_err();
        assert!(err.to_string().contains("Cannot read samples file"));
    }
}
