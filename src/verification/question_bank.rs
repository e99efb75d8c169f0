use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Underlying language whose question set a skill label is quizzed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuizLanguage {
    JavaScript,
    Python,
    Java,
    Cpp,
    Sql,
}

impl QuizLanguage {
    /// Question set used when a skill label maps to nothing.
    pub const BASE: Self = Self::JavaScript;

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "javascript" | "js" => Some(Self::JavaScript),
            "python" | "py" => Some(Self::Python),
            "java" => Some(Self::Java),
            "cpp" | "c++" => Some(Self::Cpp),
            "sql" => Some(Self::Sql),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::JavaScript => "javascript",
            Self::Python => "python",
            Self::Java => "java",
            Self::Cpp => "cpp",
            Self::Sql => "sql",
        }
    }

    pub fn questions(self) -> &'static [Question] {
        match self {
            Self::JavaScript => JAVASCRIPT,
            Self::Python => PYTHON,
            Self::Java => JAVA,
            Self::Cpp => CPP,
            Self::Sql => SQL,
        }
    }
}

impl fmt::Display for QuizLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Built-in skill label -> quiz language table. Labels are lowercase.
const SKILL_LANGUAGES: &[(&str, QuizLanguage)] = &[
    ("javascript", QuizLanguage::JavaScript),
    ("typescript", QuizLanguage::JavaScript),
    ("react", QuizLanguage::JavaScript),
    ("react native", QuizLanguage::JavaScript),
    ("next.js", QuizLanguage::JavaScript),
    ("node.js", QuizLanguage::JavaScript),
    ("nodejs", QuizLanguage::JavaScript),
    ("express", QuizLanguage::JavaScript),
    ("vue", QuizLanguage::JavaScript),
    ("angular", QuizLanguage::JavaScript),
    ("python", QuizLanguage::Python),
    ("django", QuizLanguage::Python),
    ("flask", QuizLanguage::Python),
    ("fastapi", QuizLanguage::Python),
    ("pandas", QuizLanguage::Python),
    ("machine learning", QuizLanguage::Python),
    ("java", QuizLanguage::Java),
    ("spring", QuizLanguage::Java),
    ("spring boot", QuizLanguage::Java),
    ("android", QuizLanguage::Java),
    ("c++", QuizLanguage::Cpp),
    ("cpp", QuizLanguage::Cpp),
    ("unreal engine", QuizLanguage::Cpp),
    ("sql", QuizLanguage::Sql),
    ("mysql", QuizLanguage::Sql),
    ("postgresql", QuizLanguage::Sql),
    ("sqlite", QuizLanguage::Sql),
];

/// Skill label to quiz language lookup, with configurable extra aliases.
#[derive(Debug, Clone, Default)]
pub struct SkillLanguageTable {
    overrides: HashMap<String, QuizLanguage>,
}

impl SkillLanguageTable {
    pub fn new(overrides: HashMap<String, QuizLanguage>) -> Self {
        Self {
            overrides: overrides
                .into_iter()
                .map(|(skill, language)| (skill.trim().to_lowercase(), language))
                .collect(),
        }
    }

    pub fn lookup(&self, skill: &str) -> Option<QuizLanguage> {
        let key = skill.trim().to_lowercase();
        self.overrides.get(&key).copied().or_else(|| {
            SKILL_LANGUAGES
                .iter()
                .find(|(label, _)| *label == key)
                .map(|(_, language)| *language)
        })
    }

    pub fn resolve(&self, skill: &str) -> QuizLanguage {
        self.lookup(skill).unwrap_or(QuizLanguage::BASE)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Question {
    pub id: &'static str,
    pub prompt: &'static str,
    pub options: &'static [&'static str],
    pub answer: usize,
}

const JAVASCRIPT: &[Question] = &[
    Question {
        id: "js-typeof-null",
        prompt: "What does `typeof null` evaluate to?",
        options: &["\"null\"", "\"object\"", "\"undefined\"", "\"number\""],
        answer: 1,
    },
    Question {
        id: "js-strict-equality",
        prompt: "Which operator compares both value and type?",
        options: &["==", "=", "===", "!="],
        answer: 2,
    },
    Question {
        id: "js-const",
        prompt: "What happens when you reassign a variable declared with `const`?",
        options: &[
            "It is silently ignored",
            "A TypeError is thrown",
            "The value is updated",
            "It becomes undefined",
        ],
        answer: 1,
    },
    Question {
        id: "js-array-map",
        prompt: "What does `[1, 2, 3].map(x => x * 2)` return?",
        options: &["[1, 2, 3]", "[2, 4, 6]", "6", "undefined"],
        answer: 1,
    },
    Question {
        id: "js-promise-all",
        prompt: "What does `Promise.all` do when one of its promises rejects?",
        options: &[
            "Waits for the rest and resolves",
            "Rejects immediately with that reason",
            "Retries the rejected promise",
            "Resolves with undefined for that entry",
        ],
        answer: 1,
    },
    Question {
        id: "js-closure",
        prompt: "A function that remembers variables from its defining scope is called a...",
        options: &["Callback", "Closure", "Prototype", "Generator"],
        answer: 1,
    },
    Question {
        id: "js-spread",
        prompt: "What does `[...'hi']` produce?",
        options: &["['hi']", "['h', 'i']", "'hi'", "SyntaxError"],
        answer: 1,
    },
    Question {
        id: "js-event-loop",
        prompt: "Which runs first after the current task: a resolved promise callback or a `setTimeout(fn, 0)`?",
        options: &[
            "The setTimeout callback",
            "The promise callback",
            "They run in parallel",
            "It is random",
        ],
        answer: 1,
    },
];

const PYTHON: &[Question] = &[
    Question {
        id: "py-list-slice",
        prompt: "What does `[1, 2, 3, 4][1:3]` return?",
        options: &["[1, 2]", "[2, 3]", "[2, 3, 4]", "[1, 2, 3]"],
        answer: 1,
    },
    Question {
        id: "py-mutable-default",
        prompt: "Why is `def f(items=[])` considered risky?",
        options: &[
            "It is a syntax error",
            "The default list is shared between calls",
            "Lists cannot be default values",
            "It makes the function async",
        ],
        answer: 1,
    },
    Question {
        id: "py-dict-get",
        prompt: "What does `{}.get('missing', 0)` return?",
        options: &["None", "KeyError", "0", "'missing'"],
        answer: 2,
    },
    Question {
        id: "py-comprehension",
        prompt: "What does `[x for x in range(5) if x % 2 == 0]` produce?",
        options: &["[1, 3]", "[0, 2, 4]", "[0, 1, 2, 3, 4]", "[2, 4]"],
        answer: 1,
    },
    Question {
        id: "py-tuple-immutable",
        prompt: "Which of these types is immutable?",
        options: &["list", "dict", "tuple", "set"],
        answer: 2,
    },
    Question {
        id: "py-with",
        prompt: "What does the `with` statement guarantee for a file object?",
        options: &[
            "The file is read fully",
            "The file is closed when the block exits",
            "The file is locked",
            "The file is created if missing",
        ],
        answer: 1,
    },
    Question {
        id: "py-floor-div",
        prompt: "What is `7 // 2`?",
        options: &["3.5", "3", "4", "1"],
        answer: 1,
    },
    Question {
        id: "py-generator",
        prompt: "Which keyword turns a function into a generator?",
        options: &["return", "async", "yield", "lambda"],
        answer: 2,
    },
];

const JAVA: &[Question] = &[
    Question {
        id: "java-string-equals",
        prompt: "How should two `String` values be compared for content equality?",
        options: &["a == b", "a.equals(b)", "a.compareTo(b) == 1", "a.hashCode() == b"],
        answer: 1,
    },
    Question {
        id: "java-final-class",
        prompt: "What does marking a class `final` do?",
        options: &[
            "Makes its fields constant",
            "Prevents it from being subclassed",
            "Makes it a singleton",
            "Prevents instantiation",
        ],
        answer: 1,
    },
    Question {
        id: "java-interface",
        prompt: "How many interfaces can a Java class implement?",
        options: &["Exactly one", "At most two", "Any number", "None"],
        answer: 2,
    },
    Question {
        id: "java-checked-exception",
        prompt: "Which of these is a checked exception?",
        options: &[
            "NullPointerException",
            "IOException",
            "ArithmeticException",
            "IllegalStateException",
        ],
        answer: 1,
    },
    Question {
        id: "java-arraylist",
        prompt: "What is the average cost of `ArrayList.get(i)`?",
        options: &["O(1)", "O(log n)", "O(n)", "O(n log n)"],
        answer: 0,
    },
    Question {
        id: "java-static",
        prompt: "A `static` method belongs to...",
        options: &["Each instance", "The class", "The package", "The JVM thread"],
        answer: 1,
    },
    Question {
        id: "java-hashmap-null",
        prompt: "Does `HashMap` allow a null key?",
        options: &["No", "Yes, one", "Yes, many", "Only in Java 8+"],
        answer: 1,
    },
];

const CPP: &[Question] = &[
    Question {
        id: "cpp-reference",
        prompt: "What does `int& r = x;` declare?",
        options: &["A pointer to x", "A copy of x", "A reference to x", "An rvalue"],
        answer: 2,
    },
    Question {
        id: "cpp-raii",
        prompt: "RAII ties resource lifetime to...",
        options: &[
            "The garbage collector",
            "Object lifetime",
            "Thread lifetime",
            "Program exit",
        ],
        answer: 1,
    },
    Question {
        id: "cpp-unique-ptr",
        prompt: "Can a `std::unique_ptr` be copied?",
        options: &["Yes", "No, only moved", "Only if const", "Only with new"],
        answer: 1,
    },
    Question {
        id: "cpp-virtual",
        prompt: "Which keyword enables runtime polymorphism for a member function?",
        options: &["static", "inline", "virtual", "explicit"],
        answer: 2,
    },
    Question {
        id: "cpp-vector-push",
        prompt: "What may happen to iterators after `std::vector::push_back`?",
        options: &[
            "Nothing",
            "They may be invalidated",
            "They are reset to begin()",
            "They become const",
        ],
        answer: 1,
    },
    Question {
        id: "cpp-const-method",
        prompt: "A member function declared `const` promises to...",
        options: &[
            "Return a constant",
            "Not modify the object's observable state",
            "Be evaluated at compile time",
            "Never throw",
        ],
        answer: 1,
    },
    Question {
        id: "cpp-header-guard",
        prompt: "What does `#pragma once` prevent?",
        options: &[
            "Multiple inclusion of a header",
            "Inlining",
            "Name mangling",
            "Template instantiation",
        ],
        answer: 0,
    },
];

const SQL: &[Question] = &[
    Question {
        id: "sql-where-having",
        prompt: "Which clause filters groups after aggregation?",
        options: &["WHERE", "HAVING", "ORDER BY", "LIMIT"],
        answer: 1,
    },
    Question {
        id: "sql-inner-join",
        prompt: "An INNER JOIN returns...",
        options: &[
            "All rows from the left table",
            "Only rows with matches in both tables",
            "All rows from both tables",
            "Rows without matches",
        ],
        answer: 1,
    },
    Question {
        id: "sql-null-compare",
        prompt: "How do you test whether a column is NULL?",
        options: &["col = NULL", "col IS NULL", "col == NULL", "ISNULL = col"],
        answer: 1,
    },
    Question {
        id: "sql-primary-key",
        prompt: "A primary key must be...",
        options: &[
            "Unique and not null",
            "A number",
            "Auto-incremented",
            "Indexed twice",
        ],
        answer: 0,
    },
    Question {
        id: "sql-count-star",
        prompt: "Does `COUNT(col)` count NULL values in col?",
        options: &["Yes", "No", "Only in MySQL", "Only with DISTINCT"],
        answer: 1,
    },
    Question {
        id: "sql-index",
        prompt: "What is the main trade-off of adding an index?",
        options: &[
            "Faster writes, slower reads",
            "Faster reads, slower writes",
            "Less disk usage",
            "No trade-off",
        ],
        answer: 1,
    },
    Question {
        id: "sql-transaction",
        prompt: "Which statement undoes the current transaction's changes?",
        options: &["COMMIT", "ROLLBACK", "REVERT", "DELETE"],
        answer: 1,
    },
];
