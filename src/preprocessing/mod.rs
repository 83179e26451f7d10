pub mod entities;
pub mod lemmatizer;
pub mod stop_words;
pub mod tokenizer;
