//! The bilingual quiz question bank

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use digiskill_core::Error;

/// Languages the quiz is available in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Hi,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Hi => "hi",
        }
    }
}

impl FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "en" => Ok(Language::En),
            "hi" => Ok(Language::Hi),
            _ => Err(Error::InvalidInput("Language not supported".to_string())),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Question difficulty, ordered from easiest to hardest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Basic,
    Intermediate,
    Advanced,
}

/// A value available in every quiz language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Localized<T> {
    pub en: T,
    pub hi: T,
}

impl<T> Localized<T> {
    pub fn get(&self, language: Language) -> &T {
        match language {
            Language::En => &self.en,
            Language::Hi => &self.hi,
        }
    }
}

/// A quiz question in all languages, including the correct option index
#[derive(Debug, Clone, Serialize)]
pub struct QuizQuestion {
    pub id: u32,
    pub question: Localized<&'static str>,
    pub options: Localized<[&'static str; 4]>,
    pub correct: usize,
    pub skill: &'static str,
    pub difficulty: Difficulty,
}

/// A question rendered in one language; the answer key is left out
#[derive(Debug, Clone, Serialize)]
pub struct LocalizedQuestion {
    pub id: u32,
    pub question: &'static str,
    pub options: [&'static str; 4],
    pub skill: &'static str,
    pub difficulty: Difficulty,
}

impl QuizQuestion {
    pub fn localize(&self, language: Language) -> LocalizedQuestion {
        LocalizedQuestion {
            id: self.id,
            question: *self.question.get(language),
            options: *self.options.get(language),
            skill: self.skill,
            difficulty: self.difficulty,
        }
    }
}

pub const WEB_FUNDAMENTALS: &str = "Web Fundamentals";
pub const CYBERSECURITY: &str = "Cybersecurity";

static QUESTION_BANK: [QuizQuestion; 10] = [
    QuizQuestion {
        id: 1,
        question: Localized {
            en: "What is a URL?",
            hi: "URL क्या है?",
        },
        options: Localized {
            en: ["A software program", "A web address", "A computer virus", "A programming code"],
            hi: ["एक सॉफ्टवेयर प्रोग्राम", "एक वेब पता", "एक कंप्यूटर वायरस", "एक प्रोग्रामिंग कोड"],
        },
        correct: 1,
        skill: WEB_FUNDAMENTALS,
        difficulty: Difficulty::Basic,
    },
    QuizQuestion {
        id: 2,
        question: Localized {
            en: "What does HTTPS stand for?",
            hi: "HTTPS का क्या मतलब है?",
        },
        options: Localized {
            en: ["Hyper Text Transfer Protocol Secure", "High Transfer Protocol", "Home Tool Transfer", "HTTP Secure"],
            hi: ["हाइपर टेक्स्ट ट्रांसफर प्रोटोकॉल सिक्योर", "हाई ट्रांसफर प्रोटोकॉल", "होम टूल ट्रांसफर", "HTTP सिक्योर"],
        },
        correct: 0,
        skill: CYBERSECURITY,
        difficulty: Difficulty::Intermediate,
    },
    QuizQuestion {
        id: 3,
        question: Localized {
            en: "What is phishing?",
            hi: "फिशिंग क्या है?",
        },
        options: Localized {
            en: ["A type of fishing game", "A cyber attack using fake emails", "A computer virus", "A software bug"],
            hi: ["एक प्रकार का मछली पकड़ने का खेल", "फर्जी ईमेल का उपयोग करने वाला साइबर हमला", "एक कंप्यूटर वायरस", "एक सॉफ्टवेयर बग"],
        },
        correct: 1,
        skill: CYBERSECURITY,
        difficulty: Difficulty::Intermediate,
    },
    QuizQuestion {
        id: 4,
        question: Localized {
            en: "Which is a strong password?",
            hi: "कौन सा एक मजबूत पासवर्ड है?",
        },
        options: Localized {
            en: ["123456", "password123", "MyP@ssw0rd!", "qwerty"],
            hi: ["123456", "password123", "MyP@ssw0rd!", "qwerty"],
        },
        correct: 2,
        skill: CYBERSECURITY,
        difficulty: Difficulty::Basic,
    },
    QuizQuestion {
        id: 5,
        question: Localized {
            en: "What is two-factor authentication?",
            hi: "दो-कारक प्रमाणीकरण क्या है?",
        },
        options: Localized {
            en: ["Using two passwords", "A second verification step", "Two usernames", "Double login"],
            hi: ["दो पासवर्ड का उपयोग", "एक दूसरा सत्यापन कदम", "दो यूजरनेम", "डबल लॉगिन"],
        },
        correct: 1,
        skill: CYBERSECURITY,
        difficulty: Difficulty::Intermediate,
    },
    QuizQuestion {
        id: 6,
        question: Localized {
            en: "What is a browser?",
            hi: "ब्राउज़र क्या है?",
        },
        options: Localized {
            en: ["A search engine", "A web application", "A computer program", "An internet service"],
            hi: ["एक सर्च इंजन", "एक वेब एप्लिकेशन", "एक कंप्यूटर प्रोग्राम", "एक इंटरनेट सेवा"],
        },
        correct: 2,
        skill: WEB_FUNDAMENTALS,
        difficulty: Difficulty::Basic,
    },
    QuizQuestion {
        id: 7,
        question: Localized {
            en: "What is a cookie in web browsing?",
            hi: "वेब ब्राउज़िंग में कुकी क्या है?",
        },
        options: Localized {
            en: ["A type of food", "A small data file", "A virus", "A website"],
            hi: ["एक प्रकार का भोजन", "एक छोटी डेटा फाइल", "एक वायरस", "एक वेबसाइट"],
        },
        correct: 1,
        skill: WEB_FUNDAMENTALS,
        difficulty: Difficulty::Intermediate,
    },
    QuizQuestion {
        id: 8,
        question: Localized {
            en: "What is malware?",
            hi: "मैलवेयर क्या है?",
        },
        options: Localized {
            en: ["A type of software", "Malicious software", "A computer game", "A web browser"],
            hi: ["एक प्रकार का सॉफ्टवेयर", "दुर्भावनापूर्ण सॉफ्टवेयर", "एक कंप्यूटर गेम", "एक वेब ब्राउज़र"],
        },
        correct: 1,
        skill: CYBERSECURITY,
        difficulty: Difficulty::Intermediate,
    },
    QuizQuestion {
        id: 9,
        question: Localized {
            en: "What is a VPN?",
            hi: "VPN क्या है?",
        },
        options: Localized {
            en: ["A video game", "Virtual Private Network", "A website", "A computer virus"],
            hi: ["एक वीडियो गेम", "वर्चुअल प्राइवेट नेटवर्क", "एक वेबसाइट", "एक कंप्यूटर वायरस"],
        },
        correct: 1,
        skill: CYBERSECURITY,
        difficulty: Difficulty::Advanced,
    },
    QuizQuestion {
        id: 10,
        question: Localized {
            en: "What is the purpose of a firewall?",
            hi: "फायरवॉल का उद्देश्य क्या है?",
        },
        options: Localized {
            en: ["To block websites", "To protect against unauthorized access", "To speed up internet", "To store files"],
            hi: ["वेबसाइटों को ब्लॉक करने के लिए", "अनधिकृत पहुंच से बचाने के लिए", "इंटरनेट को तेज करने के लिए", "फाइलें संग्रहीत करने के लिए"],
        },
        correct: 1,
        skill: CYBERSECURITY,
        difficulty: Difficulty::Advanced,
    },
];

/// The fixed question bank, ordered by id
pub fn question_bank() -> &'static [QuizQuestion] {
    &QUESTION_BANK
}

/// Look up a question by the id a client submitted
pub fn find_question(id: i64) -> Option<&'static QuizQuestion> {
    QUESTION_BANK.iter().find(|q| i64::from(q.id) == id)
}

/// Every question in one language, in bank order
pub fn localized(language: Language) -> Vec<LocalizedQuestion> {
    QUESTION_BANK.iter().map(|q| q.localize(language)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bank_shape() {
        let bank = question_bank();
        assert_eq!(bank.len(), 10);
        for (index, question) in bank.iter().enumerate() {
            assert_eq!(question.id as usize, index + 1);
            assert!(question.correct < 4);
            assert!(question.skill == WEB_FUNDAMENTALS || question.skill == CYBERSECURITY);
        }
    }

    #[test]
    fn test_find_question() {
        let question = find_question(4).unwrap();
        assert_eq!(question.options.en[question.correct], "MyP@ssw0rd!");
        assert!(find_question(0).is_none());
        assert!(find_question(11).is_none());
        assert!(find_question(-4).is_none());
    }

    #[test]
    fn test_language_parsing() {
        assert_eq!("en".parse::<Language>().unwrap(), Language::En);
        assert_eq!("hi".parse::<Language>().unwrap(), Language::Hi);

        let err = "fr".parse::<Language>().unwrap_err();
        assert!(matches!(err, Error::InvalidInput(ref m) if m == "Language not supported"));
        assert!("EN".parse::<Language>().is_err());
    }

    #[test]
    fn test_localized_questions() {
        for language in [Language::En, Language::Hi] {
            let questions = localized(language);
            assert_eq!(questions.len(), 10);
            assert_eq!(questions[0].question, *question_bank()[0].question.get(language));
        }

        let hindi = localized(Language::Hi);
        assert_eq!(hindi[8].question, "VPN क्या है?");
        assert_eq!(hindi[8].options[1], "वर्चुअल प्राइवेट नेटवर्क");
    }

    #[test]
    fn test_difficulty_order() {
        assert!(Difficulty::Basic < Difficulty::Intermediate);
        assert!(Difficulty::Intermediate < Difficulty::Advanced);
    }
}
