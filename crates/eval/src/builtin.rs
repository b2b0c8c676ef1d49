use std::str::FromStr;

/// A primitive operator, dispatched by the text of the operator symbol.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[derive(strum::Display, strum::EnumString, strum::IntoStaticStr)]
pub enum Builtin {
    #[strum(serialize = "+")]
    Add,
    #[strum(serialize = "-")]
    Sub,
    #[strum(serialize = "*")]
    Mul,
    #[strum(serialize = "/")]
    Div,
    /// Reserved in the dispatcher but unimplemented.
    #[strum(serialize = "%")]
    Rem,
    #[strum(serialize = "<")]
    Lt,
    #[strum(serialize = ">")]
    Gt,
    #[strum(serialize = "=")]
    NumEq,
    #[strum(serialize = "eq?")]
    Eq,
    #[strum(serialize = "equal?")]
    Equal,
    #[strum(serialize = "number?")]
    IsNumber,
    #[strum(serialize = "symbol?")]
    IsSymbol,
    #[strum(serialize = "null?")]
    IsNull,
    #[strum(serialize = "cons")]
    Cons,
    #[strum(serialize = "car")]
    Car,
    #[strum(serialize = "cdr")]
    Cdr,
    #[strum(serialize = "quote")]
    Quote,
    #[strum(serialize = "cond")]
    Cond,
    #[strum(serialize = "define")]
    Define,
    #[strum(serialize = "print")]
    Print,
    #[strum(serialize = "display")]
    Display,
}

impl Builtin {
    /// Resolves an operator name to a primitive, if it names one.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::from_str(name).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_resolve() {
        assert_eq!(Builtin::from_name("+"), Some(Builtin::Add));
        assert_eq!(Builtin::from_name("%"), Some(Builtin::Rem));
        assert_eq!(Builtin::from_name("eq?"), Some(Builtin::Eq));
        assert_eq!(Builtin::from_name("null?"), Some(Builtin::IsNull));
        assert_eq!(Builtin::from_name("define"), Some(Builtin::Define));
        assert_eq!(Builtin::from_name("lambda"), None);
        assert_eq!(Builtin::from_name("else"), None);
        assert_eq!(Builtin::from_name("foo"), None);
    }

    #[test]
    fn names_roundtrip() {
        for b in [Builtin::Add, Builtin::NumEq, Builtin::IsSymbol, Builtin::Cdr] {
            assert_eq!(Builtin::from_name(&b.to_string()), Some(b));
        }
    }
}
