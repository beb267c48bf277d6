use super::Atom;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SelectionParserError {
    #[error("selection syntax error: {0}")]
    SyntaxError(String),
}

#[derive(Debug, Clone)]
pub enum IntValue {
    Single(i32),
    /// Inclusive range `a-b`.
    Range(i32, i32),
}

#[derive(Debug, Clone)]
pub enum StrValue {
    Str(String),
    Regex(regex::Regex),
}

impl StrValue {
    fn matches(&self, s: &str) -> bool {
        match self {
            StrValue::Str(v) => v == s,
            StrValue::Regex(r) => r.is_match(s),
        }
    }
}

/// Parsed selection expression tree.
#[derive(Debug, Clone)]
pub enum SelectionAst {
    Or(Box<SelectionAst>, Box<SelectionAst>),
    And(Box<SelectionAst>, Box<SelectionAst>),
    Not(Box<SelectionAst>),
    Resi(Vec<IntValue>),
    Resn(Vec<StrValue>),
    Name(Vec<StrValue>),
    Chain(Vec<char>),
    Elem(Vec<String>),
    All,
}

impl SelectionAst {
    /// Per-atom predicate. Residue ranges that lie outside the actual
    /// sequence simply match nothing.
    pub fn matches(&self, at: &Atom) -> bool {
        match self {
            SelectionAst::Or(a, b) => a.matches(at) || b.matches(at),
            SelectionAst::And(a, b) => a.matches(at) && b.matches(at),
            SelectionAst::Not(a) => !a.matches(at),
            SelectionAst::Resi(vals) => vals.iter().any(|v| match v {
                IntValue::Single(r) => at.resid == *r,
                IntValue::Range(a, b) => at.resid >= *a && at.resid <= *b,
            }),
            SelectionAst::Resn(vals) => vals.iter().any(|v| v.matches(&at.resname)),
            SelectionAst::Name(vals) => vals.iter().any(|v| v.matches(&at.name)),
            SelectionAst::Chain(chains) => chains.contains(&at.chain),
            SelectionAst::Elem(els) => els
                .iter()
                .any(|e| e.eq_ignore_ascii_case(at.element_name())),
            SelectionAst::All => true,
        }
    }
}

peg::parser! {
    grammar selection_grammar() for str {
        // Optional whitespace
        rule _ = (" " / "\t")*
        // Mandatory whitespace
        rule __ = (" " / "\t")+
        // Mandatory whitespace unless followed by paren
        rule ___ = _ &"(" / __

        rule uint() -> i32
            = n:$(['0'..='9']+)
            {? n.parse().or(Err("integer")) }

        rule int_range() -> IntValue
            = i1:uint() "-" i2:uint()
            { IntValue::Range(i1, i2) }

        rule int_single() -> IntValue
            = i:uint()
            { IntValue::Single(i) }

        // PyMOL-style value lists: `1-200`, `10+840+863`
        rule resi_expr() -> SelectionAst
            = "resi" __ v:((int_range() / int_single()) ++ "+")
            { SelectionAst::Resi(v) }

        rule regex_value() -> StrValue
            = "/" s:$((!"/" [_])+) "/"
            {?
                match regex::Regex::new(&format!("^{s}$")) {
                    Ok(r) => Ok(StrValue::Regex(r)),
                    Err(_) => Err("valid regex"),
                }
            }

        rule str_value() -> StrValue
            = s:$((['a'..='z' | 'A'..='Z' | '0'..='9' | '\'' | '*'])+)
            { StrValue::Str(s.to_owned()) }

        rule resn_expr() -> SelectionAst
            = "resn" __ v:((regex_value() / str_value()) ++ "+")
            { SelectionAst::Resn(v) }

        rule name_expr() -> SelectionAst
            = "name" __ v:((regex_value() / str_value()) ++ "+")
            { SelectionAst::Name(v) }

        rule chain_expr() -> SelectionAst
            = "chain" __ v:(['a'..='z' | 'A'..='Z' | '0'..='9'] ++ "+")
            { SelectionAst::Chain(v) }

        rule elem_expr() -> SelectionAst
            = "elem" __ v:($(['a'..='z' | 'A'..='Z']*<1,2>) ++ "+")
            { SelectionAst::Elem(v.into_iter().map(|s| s.to_owned()).collect()) }

        rule keyword_expr() -> SelectionAst
            = resi_expr() / resn_expr() / name_expr() / chain_expr() / elem_expr()

        rule all_expr() -> SelectionAst
            = "all" { SelectionAst::All }

        pub rule logical_expr() -> SelectionAst = precedence!{
            x:(@) ___ "or" ___ y:@ { SelectionAst::Or(Box::new(x), Box::new(y)) }
            --
            x:(@) ___ "and" ___ y:@ { SelectionAst::And(Box::new(x), Box::new(y)) }
            --
            "not" ___ x:@ { SelectionAst::Not(Box::new(x)) }
            --
            k:keyword_expr() { k }
            a:all_expr() { a }
            "(" _ e:logical_expr() _ ")" { e }
        }
    }
}

/// A compiled selection expression.
///
/// The surface mirrors the PyMOL idioms used throughout the rendering
/// pipeline: `resi 1-200 or resi 500-800`, `resn ASP+GLU+HIS`,
/// `name CA`, `elem C`, `chain A`, with `and`/`or`/`not` and parens.
#[derive(Debug, Clone)]
pub struct SelectionExpr {
    ast: SelectionAst,
    sel_str: String,
}

impl SelectionExpr {
    pub fn new(s: impl AsRef<str>) -> Result<Self, SelectionParserError> {
        let s = s.as_ref().trim();
        let ast = selection_grammar::logical_expr(s).map_err(|e| {
            let err_str = format!(
                "\n{s}\n{}^\nExpected {}",
                "-".repeat(e.location.column - 1),
                e.expected
            );
            SelectionParserError::SyntaxError(err_str)
        })?;
        Ok(Self {
            ast,
            sel_str: s.to_owned(),
        })
    }

    /// Returns the original selection expression string.
    pub fn get_str(&self) -> &str {
        &self.sel_str
    }

    pub fn ast(&self) -> &SelectionAst {
        &self.ast
    }
}
