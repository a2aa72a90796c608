///A single token in the input stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    ///The lowercased text of the token
    pub text: String,

    ///Zero-based index in the emitted token sequence
    pub position: usize,

    ///True iff every character of the token is an alphabetic letter
    pub alphabetic: bool,
}

///Split text into lowercase word and punctuation tokens.
///Runs of alphanumeric characters form word tokens, every other
///non-whitespace character becomes a token of its own, whitespace only
///separates. Positions index the emitted sequence.
pub fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens: Vec<Token> = Vec::new();
    let mut word = String::new();
    for c in text.chars() {
        if c.is_alphanumeric() {
            for lc in c.to_lowercase() {
                word.push(lc);
            }
        } else {
            if !word.is_empty() {
                push_token(&mut tokens, std::mem::take(&mut word));
            }
            if !c.is_whitespace() {
                push_token(&mut tokens, c.to_lowercase().collect());
            }
        }
    }
    if !word.is_empty() {
        push_token(&mut tokens, word);
    }
    tokens
}

fn push_token(tokens: &mut Vec<Token>, text: String) {
    let alphabetic = !text.is_empty() && text.chars().all(|c| c.is_alphabetic());
    tokens.push(Token {
        text,
        position: tokens.len(),
        alphabetic,
    });
}
