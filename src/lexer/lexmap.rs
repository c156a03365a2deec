//! Keyword table.
//!
//! Both the Arabic and English surface forms are accepted for every keyword;
//! lookup is still a single hash-map probe on the maximal identifier.

use once_cell::sync::Lazy;
use std::collections::HashMap;

use super::TokenKind;

pub static KEYWORDS: Lazy<HashMap<&'static str, TokenKind>> = Lazy::new(|| {
    use TokenKind::*;

    let mut m = HashMap::new();
    m.insert("خروج", Exit);
    m.insert("exit", Exit);
    m.insert("دع", Let);
    m.insert("let", Let);
    m.insert("اذا", If);
    m.insert("if", If);
    m.insert("واذا", Elif);
    m.insert("elif", Elif);
    m.insert("وإلا", Else);
    m.insert("else", Else);
    m.insert("بينما", While);
    m.insert("while", While);
    m.insert("ارجع", Return);
    m.insert("return", Return);
    m
});
