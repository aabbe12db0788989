use serde::Serialize;

const GREETING_PLACEHOLDER: &str = "{greeting}";

/// One prompt in the fixed assessment sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Question {
    pub id: u32,
    pub category: &'static str,
    pub text: &'static str,
    pub instruction: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_text: Option<&'static str>,
}

impl Question {
    /// Prompt text with `{greeting}` replaced by how the participant is addressed.
    pub fn prompt(&self, greeting: &str) -> String {
        self.text.replace(GREETING_PLACEHOLDER, greeting)
    }
}

const READ_ALOUD_PASSAGE: &str = "Calling him a picky eater is not fair: he never asks for \
delicacies, only for simple things done exactly right. A meal needs no meat or fish, just \
a plate of squash blossoms with a thick, fragrant shrimp dipping sauce. Late at night, \
reading, a sweet steamed potato wrapped in pandan leaves is all he wants.";

static CATALOG: [Question; 12] = [
    Question {
        id: 1,
        category: "Personal information",
        text: "Hello {greeting}! Please spell out your full name",
        instruction: "Say each letter of your full name",
        sample_text: None,
    },
    Question {
        id: 2,
        category: "Verbal reasoning",
        text: "{greeting}, please describe the picture below in as much detail as you can",
        instruction: "Name what you see, explain what each part means, how the details relate, \
and what the picture is trying to say overall",
        sample_text: None,
    },
    Question {
        id: 3,
        category: "Spatial orientation",
        text: "Hello {greeting}! Please read this passage aloud, clearly",
        instruction: "Read the passage loudly and clearly",
        sample_text: Some(READ_ALOUD_PASSAGE),
    },
    Question {
        id: 4,
        category: "Temporal orientation",
        text: "{greeting}, can you tell me about a happy memory from recently?",
        instruction: "Describe one recent memory in at most three minutes",
        sample_text: None,
    },
    Question {
        id: 5,
        category: "Memory",
        text: "{greeting}, please describe how you cook a familiar dish or do a familiar chore",
        instruction: "Recall the steps of a task you do often",
        sample_text: None,
    },
    Question {
        id: 6,
        category: "Attention and calculation",
        text: "What is 100 minus 7? Then keep subtracting 7 five more times, saying each step",
        instruction: "100 - 7 = ?, then subtract 7 from each result and say every step aloud",
        sample_text: None,
    },
    Question {
        id: 7,
        category: "Attention",
        text: "Spell the word 'MEMORY' backwards, letter by letter",
        instruction: "Say the letters in reverse order, e.g. WORD -> D R O W",
        sample_text: None,
    },
    Question {
        id: 8,
        category: "Verbal fluency",
        text: "In one minute, name as many animals as {greeting} can remember",
        instruction: "",
        sample_text: None,
    },
    Question {
        id: 9,
        category: "Verbal fluency",
        text: "Here is a short story: Mrs. Lan bought 3 apples and 2 oranges at the market, then \
made juice for her grandchild at home. Please continue the story",
        instruction: "Continue the story with as much detail as possible",
        sample_text: None,
    },
    Question {
        id: 10,
        category: "Language",
        text: "Name 4 animals that start with the letter 'C'",
        instruction: "Think of animals whose names begin with C",
        sample_text: None,
    },
    Question {
        id: 11,
        category: "Language",
        text: "Say one sentence that uses the words 'hospital', 'doctor' and 'medicine'",
        instruction: "Make a sentence containing all three words",
        sample_text: None,
    },
    Question {
        id: 12,
        category: "Executive function",
        text: "Describe how to make a cup of coffee from start to finish",
        instruction: "Say each step in order",
        sample_text: None,
    },
];

/// The assessment questions, in presentation order.
pub fn catalog() -> &'static [Question] {
    &CATALOG
}

pub fn find(id: u32) -> Option<&'static Question> {
    CATALOG.iter().find(|q| q.id == id)
}
