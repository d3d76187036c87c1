use std::time::Instant;

pub const SENTENCES: [&str; 10] = [
    "The quick brown fox jumps over the lazy dog.",
    "Programming is the art of telling another human what one wants the computer to do.",
    "Be the change you wish to see in the world.",
    "To be or not to be, that is the question.",
    "In the end, we only regret the chances we didn't take.",
    "Life is what happens when you're busy making other plans.",
    "The greatest glory in living lies not in never falling, but in rising every time we fall.",
    "The way to get started is to quit talking and begin doing.",
    "It does not matter how slowly you go as long as you do not stop.",
    "Whether you think you can or you think you can't, you're right.",
];

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Phase {
    Start,
    Typing,
    Finished,
}

/// Outcome of one typed character.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Keystroke {
    Correct,
    Wrong,
    /// Not typing; the character was dropped.
    Ignored,
}

/// One typing run over a single sentence.
///
/// Wrong characters still advance the position and are kept in the input so
/// they can be shown in red. Backspace steps back but never refunds an error.
#[derive(Debug, Clone)]
pub struct TypingTest {
    phase: Phase,
    sentence: Vec<char>,
    input: String,
    position: usize,
    errors: u32,
    started: Option<Instant>,
    wpm: f32,
    accuracy: f32,
}

impl TypingTest {
    pub fn new(sentence: &str) -> Self {
        Self {
            phase: Phase::Start,
            sentence: sentence.chars().collect(),
            input: String::new(),
            position: 0,
            errors: 0,
            started: None,
            wpm: 0.0,
            accuracy: 100.0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn sentence(&self) -> String {
        self.sentence.iter().collect()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn errors(&self) -> u32 {
        self.errors
    }

    pub fn wpm(&self) -> f32 {
        self.wpm
    }

    pub fn accuracy(&self) -> f32 {
        self.accuracy
    }

    /// Whether the typed char at `index` matches the sentence.
    pub fn is_correct_at(&self, index: usize) -> bool {
        match (self.input.chars().nth(index), self.sentence.get(index)) {
            (Some(typed), Some(&expected)) => typed == expected,
            _ => false,
        }
    }

    /// Replaces the sentence and clears progress. The phase is unchanged.
    pub fn set_sentence(&mut self, sentence: &str) {
        self.sentence = sentence.chars().collect();
        self.input.clear();
        self.position = 0;
    }

    pub fn start(&mut self, now: Instant) {
        self.phase = Phase::Typing;
        self.started = Some(now);
        self.input.clear();
        self.position = 0;
        self.errors = 0;
        self.wpm = 0.0;
        self.accuracy = 100.0;
    }

    /// Abandons the run and returns to the start screen.
    pub fn cancel(&mut self) {
        self.phase = Phase::Start;
    }

    pub fn backspace(&mut self) {
        if self.phase != Phase::Typing {
            return;
        }
        if self.input.pop().is_some() {
            self.position = self.position.saturating_sub(1);
        }
    }

    pub fn type_char(&mut self, c: char, now: Instant) -> Keystroke {
        if self.phase != Phase::Typing {
            return Keystroke::Ignored;
        }
        if self.position >= self.sentence.len() {
            self.finish(now);
            return Keystroke::Ignored;
        }

        let stroke = if self.sentence[self.position] == c {
            Keystroke::Correct
        } else {
            self.errors += 1;
            Keystroke::Wrong
        };

        self.input.push(c);
        self.position += 1;

        if self.position >= self.sentence.len() {
            self.finish(now);
        }
        stroke
    }

    /// Recomputes the running WPM from characters typed so far.
    pub fn refresh_wpm(&mut self, now: Instant) {
        if self.phase != Phase::Typing {
            return;
        }
        let minutes = self.elapsed_minutes(now);
        if minutes > 0.0 {
            self.wpm = (self.position as f32 / 5.0) / minutes;
        }
    }

    fn finish(&mut self, now: Instant) {
        self.phase = Phase::Finished;

        let len = self.sentence.len();
        let minutes = self.elapsed_minutes(now);
        let words = (len / 5) as f32;
        self.wpm = if minutes > 0.0 { words / minutes } else { 0.0 };

        self.accuracy = if len == 0 {
            100.0
        } else {
            (100.0 * (1.0 - self.errors as f32 / len as f32)).max(0.0)
        };
        log::info!(
            "test finished: {:.1} wpm, {:.1}% accuracy, {} errors",
            self.wpm,
            self.accuracy,
            self.errors
        );
    }

    /// Whole milliseconds since start, in minutes.
    fn elapsed_minutes(&self, now: Instant) -> f32 {
        let Some(started) = self.started else { return 0.0; };
        now.saturating_duration_since(started).as_millis() as f32 / 60_000.0
    }
}

/// Greedy word wrap: words never split; a line holds at most `max_chars`
/// characters unless a single word is longer.
pub fn wrap_words(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut line_chars = 0;

    for word in text.split_whitespace() {
        let word_chars = word.chars().count();
        if line.is_empty() {
            line.push_str(word);
            line_chars = word_chars;
        } else if line_chars + word_chars + 1 > max_chars {
            lines.push(std::mem::take(&mut line));
            line.push_str(word);
            line_chars = word_chars;
        } else {
            line.push(' ');
            line.push_str(word);
            line_chars += word_chars + 1;
        }
    }

    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Screen shake that jitters the camera for a short time after a mistake.
#[derive(Debug, Clone, Default)]
pub struct Shake {
    remaining: f32,
    intensity: f32,
    offset: (f32, f32),
}

impl Shake {
    pub const DURATION: f32 = 0.3;
    pub const INTENSITY: f32 = 5.0;

    pub fn trigger(&mut self) {
        self.remaining = Self::DURATION;
        self.intensity = Self::INTENSITY;
    }

    pub fn is_active(&self) -> bool {
        self.remaining > 0.0
    }

    pub fn offset(&self) -> (f32, f32) {
        self.offset
    }

    /// Counts down and picks a new offset in `[-intensity, intensity]` on
    /// each axis; the offset returns to zero when the timer runs out.
    pub fn update(&mut self, dt: f32, mut sample: impl FnMut(f32, f32) -> f32) {
        if self.remaining <= 0.0 {
            return;
        }
        self.remaining -= dt;
        if self.remaining <= 0.0 {
            self.remaining = 0.0;
            self.offset = (0.0, 0.0);
        } else {
            let i = self.intensity;
            self.offset = (sample(-i, i), sample(-i, i));
        }
    }
}
