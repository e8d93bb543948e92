//! Streaming grammar parser.
//!
//! [`VcdParser`] pulls tokens from the [`Lexer`] and yields one
//! [`VcdEvent`] per recognized construct. It holds no parse tree: the only
//! state is the current phase of the file, plus the scope stack while
//! declarations are open.
//!
//! After the first error the parser is exhausted.

use crate::error::{VcdError, END_OF_INPUT};
use crate::event::{DumpKind, RawValue, ScopeKind, Spanned, ValueKind, VcdEvent};
use crate::lexer::{Lexer, Token};
use crate::scope::ScopeStack;
use crate::signal::{Signal, VarType};
use vcdscope_common::Timescale;
use vcdscope_source::{Location, Span};

/// Keywords that may only appear before `$enddefinitions`.
const DECLARATION_KEYWORDS: [&str; 7] = [
    "$scope",
    "$upscope",
    "$var",
    "$enddefinitions",
    "$timescale",
    "$date",
    "$version",
];

type ParseResult<'src> = Result<Spanned<VcdEvent<'src>>, VcdError>;

enum Phase {
    Declarations(ScopeStack),
    Body,
    Dump(DumpKind),
    Finished,
}

/// Iterator over the events of a dump.
pub struct VcdParser<'src> {
    src: &'src str,
    lexer: Lexer<'src>,
    phase: Phase,
}

impl<'src> VcdParser<'src> {
    /// Creates a parser over the whole buffer.
    pub fn new(src: &'src str) -> Self {
        Self {
            src,
            lexer: Lexer::new(src),
            phase: Phase::Declarations(ScopeStack::new()),
        }
    }

    fn location(&self, offset: usize) -> Location {
        Location::resolve(self.src, offset)
    }

    fn structural(&self, message: impl Into<String>, tok: Token<'_>) -> VcdError {
        VcdError::structural(message, tok.text, self.location(tok.span.start))
    }

    fn grammar(&self, message: impl Into<String>, tok: Token<'_>) -> VcdError {
        VcdError::grammar(message, tok.text, self.location(tok.span.start))
    }

    /// Advances to the next event; `Ok(None)` at a clean end of input.
    fn step(&mut self) -> Result<Option<Spanned<VcdEvent<'src>>>, VcdError> {
        loop {
            let Some(tok) = self.lexer.next() else {
                return self.end_of_input();
            };
            let event = match self.phase {
                Phase::Declarations(_) => self.declaration(tok)?,
                Phase::Body | Phase::Dump(_) => self.body(tok)?,
                Phase::Finished => return Ok(None),
            };
            if let Some(event) = event {
                return Ok(Some(event));
            }
        }
    }

    fn end_of_input(&self) -> Result<Option<Spanned<VcdEvent<'src>>>, VcdError> {
        let location = self.location(self.src.len());
        match self.phase {
            Phase::Declarations(_) => Err(VcdError::structural(
                "missing $enddefinitions",
                END_OF_INPUT,
                location,
            )),
            Phase::Dump(kind) => Err(VcdError::grammar(
                format!("unterminated {} block", kind.keyword()),
                END_OF_INPUT,
                location,
            )),
            Phase::Body | Phase::Finished => Ok(None),
        }
    }

    /// Collects the tokens of a `$keyword ... $end` block.
    fn block(&mut self, keyword: Token<'src>) -> Result<(Vec<Token<'src>>, Span), VcdError> {
        let mut body = Vec::new();
        for tok in self.lexer.by_ref() {
            if tok.text == "$end" {
                return Ok((body, keyword.span.to(tok.span)));
            }
            body.push(tok);
        }
        Err(self.grammar(format!("unterminated {} block", keyword.text), keyword))
    }

    fn declaration(&mut self, tok: Token<'src>) -> Result<Option<Spanned<VcdEvent<'src>>>, VcdError> {
        let event = match tok.text {
            "$date" => {
                let (body, span) = self.block(tok)?;
                Spanned::new(VcdEvent::Date(join(&body, " ")), span)
            }
            "$version" => {
                let (body, span) = self.block(tok)?;
                Spanned::new(VcdEvent::Version(join(&body, " ")), span)
            }
            "$comment" => {
                self.block(tok)?;
                return Ok(None);
            }
            "$timescale" => {
                let (body, span) = self.block(tok)?;
                let text = join(&body, "");
                let timescale = text.parse::<Timescale>().map_err(|e| {
                    VcdError::grammar(
                        format!("malformed timescale: {e}"),
                        &text,
                        self.location(tok.span.start),
                    )
                })?;
                Spanned::new(VcdEvent::TimescaleSet(timescale), span)
            }
            "$scope" => self.scope(tok)?,
            "$upscope" => {
                let (body, span) = self.block(tok)?;
                if let Some(extra) = body.first() {
                    return Err(self.grammar("unexpected token in $upscope", *extra));
                }
                let popped = match &mut self.phase {
                    Phase::Declarations(stack) => stack.pop(),
                    _ => None,
                };
                if popped.is_none() {
                    return Err(self.structural("$upscope with no open scope", tok));
                }
                Spanned::new(VcdEvent::ScopeClose, span)
            }
            "$var" => self.var(tok)?,
            "$enddefinitions" => {
                let (body, span) = self.block(tok)?;
                if let Some(extra) = body.first() {
                    return Err(self.grammar("unexpected token in $enddefinitions", *extra));
                }
                let open = match &self.phase {
                    Phase::Declarations(stack) => stack.depth(),
                    _ => 0,
                };
                if open > 0 {
                    return Err(self.structural(
                        format!("{open} scope(s) still open at $enddefinitions"),
                        tok,
                    ));
                }
                self.phase = Phase::Body;
                Spanned::new(VcdEvent::EndDefinitions, span)
            }
            "$end" => return Err(self.grammar("unexpected $end", tok)),
            text if text.starts_with('$') && DumpKind::from_keyword(text).is_none() => {
                return Err(self.grammar(format!("unknown keyword {text}"), tok));
            }
            _ => {
                return Err(self.structural(
                    "simulation data before $enddefinitions",
                    tok,
                ))
            }
        };
        Ok(Some(event))
    }

    fn scope(&mut self, tok: Token<'src>) -> ParseResult<'src> {
        let (body, span) = self.block(tok)?;
        let [kind_tok, name_tok] = body[..] else {
            return Err(self.grammar("malformed $scope declaration, expected kind and name", tok));
        };
        let kind = ScopeKind::from_keyword(kind_tok.text).ok_or_else(|| {
            self.grammar(format!("unknown scope kind '{}'", kind_tok.text), kind_tok)
        })?;
        let path = match &mut self.phase {
            Phase::Declarations(stack) => {
                stack.push(name_tok.text);
                stack.path()
            }
            _ => vec![name_tok.text.to_string()],
        };
        Ok(Spanned::new(VcdEvent::ScopeOpen { kind, path }, span))
    }

    fn var(&mut self, tok: Token<'src>) -> ParseResult<'src> {
        let (body, span) = self.block(tok)?;
        let (type_tok, width_tok, id_tok, name_tok, range) = match body[..] {
            [ty, width, id, name] => (ty, width, id, name, None),
            [ty, width, id, name, range] => (ty, width, id, name, Some(range)),
            _ => {
                return Err(self.grammar(
                    "malformed $var declaration, expected type, width, identifier and name",
                    tok,
                ))
            }
        };
        let var_type = type_tok
            .text
            .parse::<VarType>()
            .map_err(|e| self.grammar(e.to_string(), type_tok))?;
        let width = width_tok
            .text
            .parse::<u32>()
            .map_err(|_| self.grammar("non-numeric width", width_tok))?;
        let mut name = name_tok.text.to_string();
        if let Some(range) = range {
            name.push_str(range.text);
        }
        let scope = match &self.phase {
            Phase::Declarations(stack) => stack.path(),
            _ => Vec::new(),
        };
        let signal = Signal {
            id: id_tok.text.to_string(),
            var_type,
            width,
            name,
            scope,
        };
        Ok(Spanned::new(VcdEvent::VarDecl(signal), span))
    }

    fn body(&mut self, tok: Token<'src>) -> Result<Option<Spanned<VcdEvent<'src>>>, VcdError> {
        let in_dump = match self.phase {
            Phase::Dump(kind) => Some(kind),
            _ => None,
        };
        let text = tok.text;

        if let Some(digits) = text.strip_prefix('#') {
            if let Some(kind) = in_dump {
                return Err(self.grammar(
                    format!("time marker inside {} block", kind.keyword()),
                    tok,
                ));
            }
            let time = digits
                .parse::<u64>()
                .map_err(|_| self.grammar("malformed time marker", tok))?;
            return Ok(Some(Spanned::new(VcdEvent::TimeMark(time), tok.span)));
        }

        if text == "$comment" {
            self.block(tok)?;
            return Ok(None);
        }
        if text == "$end" {
            return match in_dump {
                Some(kind) => {
                    self.phase = Phase::Body;
                    Ok(Some(Spanned::new(VcdEvent::DumpEnd(kind), tok.span)))
                }
                None => Err(self.grammar("unexpected $end", tok)),
            };
        }
        if let Some(kind) = DumpKind::from_keyword(text) {
            if let Some(open) = in_dump {
                return Err(self.grammar(
                    format!("{text} inside {} block", open.keyword()),
                    tok,
                ));
            }
            self.phase = Phase::Dump(kind);
            return Ok(Some(Spanned::new(VcdEvent::DumpBegin(kind), tok.span)));
        }
        if DECLARATION_KEYWORDS.contains(&text) {
            return Err(self.structural(format!("{text} after $enddefinitions"), tok));
        }
        if text.starts_with('$') {
            return Err(self.grammar(format!("unknown keyword {text}"), tok));
        }

        self.value_change(tok).map(Some)
    }

    /// Recognizes the binary/real form, then the string form.
    fn value_change(&mut self, tok: Token<'src>) -> ParseResult<'src> {
        let text = tok.text;
        let (kind, literal, rest) = match text.as_bytes()[0] {
            b'b' | b'B' => {
                let literal = &text[1..];
                if literal.is_empty() || !literal.bytes().all(is_binary_digit) {
                    return Err(self.grammar("invalid binary literal", tok));
                }
                (ValueKind::Vector, literal, "")
            }
            b'r' | b'R' => {
                let literal = &text[1..];
                if literal.parse::<f64>().is_err() {
                    return Err(self.grammar("invalid real literal", tok));
                }
                (ValueKind::Real, literal, "")
            }
            b if is_binary_digit(b) => (ValueKind::Scalar, &text[..1], &text[1..]),
            b's' => {
                let len = text[1..]
                    .bytes()
                    .take_while(|b| b.is_ascii_alphanumeric() || *b == b'_')
                    .count();
                if len == 0 {
                    return Err(self.grammar("empty string value", tok));
                }
                (ValueKind::Text, &text[1..=len], &text[1 + len..])
            }
            _ => {
                return Err(self.grammar(
                    "value change matches neither the binary nor the string form",
                    tok,
                ))
            }
        };

        let (id, span) = if rest.is_empty() {
            let id_tok = self.identifier(tok)?;
            (id_tok.text, tok.span.to(id_tok.span))
        } else {
            (rest, tok.span)
        };
        let value = RawValue { kind, literal };
        Ok(Spanned::new(VcdEvent::ValueChange { value, id }, span))
    }

    /// Any token except a known keyword names the signal, including `$`.
    fn identifier(&mut self, value_tok: Token<'src>) -> Result<Token<'src>, VcdError> {
        match self.lexer.next() {
            Some(id) if !is_keyword(id.text) => Ok(id),
            _ => Err(self.grammar("missing identifier code after value", value_tok)),
        }
    }
}

impl<'src> Iterator for VcdParser<'src> {
    type Item = ParseResult<'src>;

    fn next(&mut self) -> Option<Self::Item> {
        if matches!(self.phase, Phase::Finished) {
            return None;
        }
        match self.step() {
            Ok(Some(event)) => Some(Ok(event)),
            Ok(None) => {
                self.phase = Phase::Finished;
                None
            }
            Err(err) => {
                self.phase = Phase::Finished;
                Some(Err(err))
            }
        }
    }
}

fn is_keyword(text: &str) -> bool {
    matches!(text, "$end" | "$comment")
        || DECLARATION_KEYWORDS.contains(&text)
        || DumpKind::from_keyword(text).is_some()
}

fn is_binary_digit(b: u8) -> bool {
    matches!(b, b'0' | b'1' | b'x' | b'X' | b'z' | b'Z')
}

fn join(tokens: &[Token<'_>], sep: &str) -> String {
    tokens
        .iter()
        .map(|t| t.text)
        .collect::<Vec<_>>()
        .join(sep)
}

#[cfg(test)]
mod tests {
    use super::*;
    use vcdscope_common::TimeUnit;

    const HEADER: &str = "$date Mon Jan 1 $end\n\
        $version sim 1.0 $end\n\
        $timescale 1 ns $end\n\
        $scope module top $end\n\
        $var wire 8 # data [7:0] $end\n\
        $var reg 1 ! clk $end\n\
        $upscope $end\n\
        $enddefinitions $end\n";

    fn events(src: &str) -> Vec<VcdEvent<'_>> {
        VcdParser::new(src)
            .map(|r| r.map(|s| s.node))
            .collect::<Result<_, _>>()
            .unwrap()
    }

    fn error(src: &str) -> VcdError {
        VcdParser::new(src)
            .find_map(Result::err)
            .expect("expected a parse error")
    }

    #[test]
    fn header_events() {
        let evs = events(HEADER);
        assert_eq!(evs[0], VcdEvent::Date("Mon Jan 1".into()));
        assert_eq!(evs[1], VcdEvent::Version("sim 1.0".into()));
        assert_eq!(
            evs[2],
            VcdEvent::TimescaleSet(Timescale::new(1, TimeUnit::Ns))
        );
        assert_eq!(
            evs[3],
            VcdEvent::ScopeOpen {
                kind: ScopeKind::Module,
                path: vec!["top".into()]
            }
        );
        let VcdEvent::VarDecl(data) = &evs[4] else {
            panic!("expected a declaration, got {:?}", evs[4]);
        };
        assert_eq!(data.name, "data[7:0]");
        assert_eq!(data.width, 8);
        assert_eq!(data.scope, vec!["top"]);
        assert_eq!(evs[6], VcdEvent::ScopeClose);
        assert_eq!(evs[7], VcdEvent::EndDefinitions);
        assert_eq!(evs.len(), 8);
    }

    #[test]
    fn body_events() {
        let src = format!("{HEADER}#0\n$dumpvars\nb00001111 #\n0!\n$end\n#5\n1 !\n");
        let evs = events(&src);
        let body = &evs[8..];
        assert_eq!(body[0], VcdEvent::TimeMark(0));
        assert_eq!(body[1], VcdEvent::DumpBegin(DumpKind::Vars));
        assert_eq!(
            body[2],
            VcdEvent::ValueChange {
                value: RawValue {
                    kind: ValueKind::Vector,
                    literal: "00001111"
                },
                id: "#"
            }
        );
        assert_eq!(
            body[3],
            VcdEvent::ValueChange {
                value: RawValue {
                    kind: ValueKind::Scalar,
                    literal: "0"
                },
                id: "!"
            }
        );
        assert_eq!(body[4], VcdEvent::DumpEnd(DumpKind::Vars));
        assert_eq!(body[5], VcdEvent::TimeMark(5));
        assert!(matches!(
            body[6],
            VcdEvent::ValueChange { value: RawValue { kind: ValueKind::Scalar, literal: "1" }, id: "!" }
        ));
    }

    #[test]
    fn string_and_real_forms() {
        let src = "$enddefinitions $end\nsHELLO!\nsbye_2 %\nr1.5e3 &\n";
        let evs = events(src);
        assert_eq!(
            evs[1],
            VcdEvent::ValueChange {
                value: RawValue {
                    kind: ValueKind::Text,
                    literal: "HELLO"
                },
                id: "!"
            }
        );
        assert!(matches!(
            evs[2],
            VcdEvent::ValueChange { value: RawValue { kind: ValueKind::Text, literal: "bye_2" }, id: "%" }
        ));
        assert!(matches!(
            evs[3],
            VcdEvent::ValueChange { value: RawValue { kind: ValueKind::Real, literal: "1.5e3" }, id: "&" }
        ));
    }

    #[test]
    fn adjacent_timescale_and_comments() {
        let src = "$comment any $var text $end\n$timescale 10us $end\n$enddefinitions $end\n\
                   $comment body note $end\n#1\n";
        let evs = events(src);
        assert_eq!(
            evs[0],
            VcdEvent::TimescaleSet(Timescale::new(10, TimeUnit::Us))
        );
        assert_eq!(evs[2], VcdEvent::TimeMark(1));
    }

    #[test]
    fn spans_cover_whole_construct() {
        let src = "$enddefinitions $end\nb10 #\n";
        let spanned: Vec<_> = VcdParser::new(src).collect::<Result<_, _>>().unwrap();
        assert_eq!(spanned[0].span, Span::new(0, 20));
        assert_eq!(&src[spanned[1].span.start..spanned[1].span.end], "b10 #");
    }

    #[test]
    fn upscope_without_scope() {
        let err = error("$upscope $end\n$enddefinitions $end\n");
        assert!(matches!(err, VcdError::Structural { ref token, .. } if token == "$upscope"));
        assert_eq!(err.location().line, 1);
    }

    #[test]
    fn unbalanced_at_enddefinitions() {
        let err = error("$scope module top $end\n$enddefinitions $end\n");
        assert!(matches!(err, VcdError::Structural { .. }));
        assert_eq!(err.location().line, 2);
    }

    #[test]
    fn unknown_var_type() {
        let err = error("$var wirex 1 ! a $end\n$enddefinitions $end\n");
        let VcdError::Grammar { token, location, .. } = err else {
            panic!("expected a grammar error");
        };
        assert_eq!(token, "wirex");
        assert_eq!((location.line, location.column), (1, 6));
    }

    #[test]
    fn unknown_scope_kind() {
        let err = error("$scope package p $end\n");
        assert!(matches!(err, VcdError::Grammar { ref token, .. } if token == "package"));
    }

    #[test]
    fn non_numeric_width() {
        let err = error("$var wire eight ! a $end\n");
        assert!(matches!(err, VcdError::Grammar { ref token, .. } if token == "eight"));
    }

    #[test]
    fn malformed_timescale() {
        assert!(matches!(
            error("$timescale 1 min $end\n$enddefinitions $end\n"),
            VcdError::Grammar { .. }
        ));
    }

    #[test]
    fn missing_enddefinitions() {
        assert!(matches!(error(""), VcdError::Structural { .. }));
        let err = error("$var wire 1 ! a $end\n");
        assert!(matches!(err, VcdError::Structural { ref token, .. } if token == END_OF_INPUT));
    }

    #[test]
    fn declaration_after_enddefinitions() {
        let err = error("$enddefinitions $end\n#0\n$var wire 1 ! a $end\n");
        assert!(matches!(err, VcdError::Structural { ref token, .. } if token == "$var"));
    }

    #[test]
    fn unterminated_block() {
        let err = error("$version never closed\n");
        assert!(matches!(err, VcdError::Grammar { ref token, .. } if token == "$version"));
        let err = error("$enddefinitions $end\n$dumpvars\n1!\n");
        assert!(matches!(err, VcdError::Grammar { ref token, .. } if token == END_OF_INPUT));
    }

    #[test]
    fn time_inside_dump_block() {
        let err = error("$enddefinitions $end\n$dumpvars\n#5\n$end\n");
        assert!(matches!(err, VcdError::Grammar { ref token, .. } if token == "#5"));
    }

    #[test]
    fn bad_value_tokens() {
        for bad in ["q!", "b102 !", "rabc !", "s !", "#x"] {
            let src = format!("$enddefinitions $end\n{bad}\n");
            assert!(
                matches!(error(&src), VcdError::Grammar { .. }),
                "expected grammar error for {bad:?}"
            );
        }
    }

    #[test]
    fn missing_identifier() {
        let err = error("$enddefinitions $end\nb101\n");
        assert!(matches!(err, VcdError::Grammar { ref token, .. } if token == "b101"));
        let err = error("$enddefinitions $end\n$dumpvars b1 $end\n");
        assert!(matches!(err, VcdError::Grammar { .. }));
    }

    #[test]
    fn dollar_identifiers_after_values() {
        let src = "$var wire 8 $ data $end\n$var real 64 $x t $end\n$var wire 1 $$ en $end\n\
            $enddefinitions $end\n#0\nb101 $\nr1.5 $x\n1 $$\nx$\n";
        let evs = events(src);
        let changes: Vec<(&str, &str)> = evs
            .iter()
            .filter_map(|ev| match ev {
                VcdEvent::ValueChange { value, id } => Some((value.literal, *id)),
                _ => None,
            })
            .collect();
        assert_eq!(
            changes,
            vec![("101", "$"), ("1.5", "$x"), ("1", "$$"), ("x", "$")]
        );
    }

    #[test]
    fn keywords_are_never_identifiers() {
        for kw in ["$end", "$dumpvars", "$var", "$comment", "$enddefinitions"] {
            let src = format!("$enddefinitions $end\n#0\nb1 {kw}\n");
            assert!(
                matches!(error(&src), VcdError::Grammar { ref token, .. } if token == "b1"),
                "expected {kw:?} to be rejected as an identifier"
            );
        }
    }

    #[test]
    fn unmarked_digit_runs_are_single_scalars() {
        // `10` is scalar 1 for id `0`; the trailing `!` is then not a value.
        let src = "$enddefinitions $end\n#0\n10 !\n";
        let mut parser = VcdParser::new(src);
        let changes: Vec<_> = parser.by_ref().take(3).collect::<Result<_, _>>().unwrap();
        assert!(matches!(
            changes[2].node,
            VcdEvent::ValueChange { value: RawValue { kind: ValueKind::Scalar, literal: "1" }, id: "0" }
        ));
        assert!(matches!(
            parser.next(),
            Some(Err(VcdError::Grammar { ref token, .. })) if token == "!"
        ));
    }

    #[test]
    fn stops_after_first_error() {
        let mut parser = VcdParser::new("$upscope $end\n$upscope $end\n");
        assert!(parser.next().unwrap().is_err());
        assert!(parser.next().is_none());
    }
}
