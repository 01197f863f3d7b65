use winnow::ascii::till_line_ending;
use winnow::combinator::{alt, cut_err, delimited, opt, preceded, repeat, separated};
use winnow::error::{ErrMode, ModalResult, StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::token::{any, take_while};

use crate::{Directive, ExclusiveGroup, Markup, Predicate, Rule, Trigger, Value};

use super::parser::ParsedForm;

// -- Whitespace & comments --------------------------------------------------

fn ws(input: &mut &str) -> ModalResult<()> {
    let _: () = repeat(
        0..,
        alt((
            take_while(1.., |c: char| c.is_whitespace()).void(),
            ('#', till_line_ending).void(),
        )),
    )
    .parse_next(input)?;
    Ok(())
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.'
}

/// Match `word` only when it is not the prefix of a longer identifier.
fn keyword(input: &mut &str, mut word: &'static str) -> ModalResult<()> {
    ws.parse_next(input)?;
    let checkpoint = input.checkpoint();
    word.parse_next(input)?;
    if input.starts_with(is_ident_char) {
        input.reset(&checkpoint);
        return Err(ErrMode::from_input(input));
    }
    Ok(())
}

fn kw(word: &'static str) -> impl FnMut(&mut &str) -> ModalResult<()> {
    move |input: &mut &str| keyword(input, word)
}

// -- Identifiers ------------------------------------------------------------

fn ident<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    ws.parse_next(input)?;
    (
        take_while(1.., |c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(0.., is_ident_char),
    )
        .take()
        .parse_next(input)
}

fn key(input: &mut &str) -> ModalResult<String> {
    ident
        .map(str::to_owned)
        .context(StrContext::Expected(StrContextValue::Description(
            "field key",
        )))
        .parse_next(input)
}

// -- Literals ---------------------------------------------------------------

fn string_literal(input: &mut &str) -> ModalResult<String> {
    ws.parse_next(input)?;
    '"'.parse_next(input)?;
    let mut s = String::new();
    loop {
        let ch = any.parse_next(input)?;
        match ch {
            '"' => return Ok(s),
            '\\' => {
                let esc = any.parse_next(input)?;
                match esc {
                    '"' => s.push('"'),
                    '\\' => s.push('\\'),
                    'n' => s.push('\n'),
                    't' => s.push('\t'),
                    other => {
                        s.push('\\');
                        s.push(other);
                    }
                }
            }
            c => s.push(c),
        }
    }
}

fn literal(input: &mut &str) -> ModalResult<Value> {
    alt((
        string_literal.map(Value::Text),
        kw("true").value(Value::Bool(true)),
        kw("false").value(Value::Bool(false)),
    ))
    .context(StrContext::Expected(StrContextValue::Description("value")))
    .parse_next(input)
}

fn literal_list(input: &mut &str) -> ModalResult<Vec<Value>> {
    delimited(
        (ws, '['),
        separated(0.., literal, (ws, ',')),
        (ws, cut_err(']')),
    )
    .parse_next(input)
}

// -- Predicates (precedence: OR < AND < NOT < primary) ----------------------

fn comparison(input: &mut &str) -> ModalResult<Predicate> {
    ws.parse_next(input)?;
    alt((
        preceded("==", cut_err(literal)).map(Predicate::Eq),
        preceded("!=", cut_err(literal)).map(Predicate::Neq),
        preceded(kw("in"), cut_err(literal_list)).map(Predicate::OneOf),
        preceded(kw("contains"), cut_err(string_literal)).map(Predicate::Contains),
        preceded(kw("icontains"), cut_err(string_literal)).map(Predicate::ContainsIgnoreCase),
    ))
    .context(StrContext::Expected(StrContextValue::Description(
        "comparison",
    )))
    .parse_next(input)
}

fn primary(input: &mut &str) -> ModalResult<Predicate> {
    ws.parse_next(input)?;
    alt((
        delimited('(', predicate, (ws, cut_err(')'))),
        preceded(kw("value"), cut_err(comparison)),
    ))
    .context(StrContext::Expected(StrContextValue::Description(
        "predicate",
    )))
    .parse_next(input)
}

fn unary(input: &mut &str) -> ModalResult<Predicate> {
    if opt(alt((kw("NOT"), kw("not")))).parse_next(input)?.is_some() {
        let inner = cut_err(unary).parse_next(input)?;
        Ok(Predicate::Not(Box::new(inner)))
    } else {
        primary(input)
    }
}

fn and_pred(input: &mut &str) -> ModalResult<Predicate> {
    let first = unary(input)?;
    let rest: Vec<Predicate> =
        repeat(0.., preceded(alt((kw("AND"), kw("and"))), cut_err(unary))).parse_next(input)?;
    Ok(rest
        .into_iter()
        .fold(first, |acc, p| Predicate::And(Box::new(acc), Box::new(p))))
}

fn or_pred(input: &mut &str) -> ModalResult<Predicate> {
    let first = and_pred(input)?;
    let rest: Vec<Predicate> =
        repeat(0.., preceded(alt((kw("OR"), kw("or"))), cut_err(and_pred))).parse_next(input)?;
    Ok(rest
        .into_iter()
        .fold(first, |acc, p| Predicate::Or(Box::new(acc), Box::new(p))))
}

fn predicate(input: &mut &str) -> ModalResult<Predicate> {
    or_pred(input)
}

// -- Directives -------------------------------------------------------------

fn selection(input: &mut &str) -> ModalResult<Option<String>> {
    alt((kw("none").value(None), key.map(Some))).parse_next(input)
}

fn directive(input: &mut &str) -> ModalResult<Directive> {
    alt((
        preceded(kw("show"), cut_err(key)).map(|target| Directive::SetVisible {
            target,
            visible: true,
        }),
        preceded(kw("hide"), cut_err(key)).map(|target| Directive::SetVisible {
            target,
            visible: false,
        }),
        preceded(kw("set"), cut_err((key, preceded((ws, '='), literal))))
            .map(|(target, value)| Directive::SetValue { target, value }),
        preceded(kw("clear"), cut_err(key)).map(|target| Directive::ClearValue { target }),
        preceded(
            kw("exclusive"),
            cut_err((key, preceded(kw("select"), selection))),
        )
        .map(|(group, selected)| Directive::MutuallyExclusiveSet { group, selected }),
    ))
    .context(StrContext::Expected(StrContextValue::Description(
        "directive",
    )))
    .parse_next(input)
}

fn directive_list(input: &mut &str) -> ModalResult<Vec<Directive>> {
    separated(1.., directive, (ws, ',')).parse_next(input)
}

// -- Rule definitions -------------------------------------------------------

fn trigger_kind(input: &mut &str) -> ModalResult<Trigger> {
    alt((
        kw("input").value(Trigger::Input),
        kw("change").value(Trigger::Change),
    ))
    .context(StrContext::Expected(StrContextValue::Description(
        "trigger",
    )))
    .parse_next(input)
}

fn rule_def(input: &mut &str) -> ModalResult<Rule> {
    keyword(input, "rule")?;

    let name = cut_err(key)
        .context(StrContext::Expected(StrContextValue::Description(
            "rule name",
        )))
        .parse_next(input)?;
    ws.parse_next(input)?;
    cut_err(':').parse_next(input)?;

    let controller = cut_err(preceded(kw("watch"), key))
        .context(StrContext::Expected(StrContextValue::Description(
            "watch clause",
        )))
        .parse_next(input)?;
    let trigger = opt(preceded(kw("on"), cut_err(trigger_kind)))
        .parse_next(input)?
        .unwrap_or_default();
    let deferred = opt(kw("deferred")).parse_next(input)?.is_some();

    let condition = cut_err(preceded(kw("when"), predicate))
        .context(StrContext::Expected(StrContextValue::Description(
            "when clause",
        )))
        .parse_next(input)?;

    let on_match = opt(preceded(kw("then"), cut_err(directive_list)))
        .parse_next(input)?
        .unwrap_or_default();
    let on_no_match = opt(preceded(kw("else"), cut_err(directive_list)))
        .parse_next(input)?
        .unwrap_or_default();

    Ok(Rule {
        name,
        controller: Some(controller),
        trigger,
        deferred,
        condition: Some(condition),
        on_match,
        on_no_match,
    })
}

// -- Exclusive groups -------------------------------------------------------

fn member(input: &mut &str) -> ModalResult<(String, String)> {
    preceded(kw("member"), cut_err((key, string_literal))).parse_next(input)
}

fn group_def(input: &mut &str) -> ModalResult<ExclusiveGroup> {
    keyword(input, "group")?;

    let name = cut_err(key).parse_next(input)?;
    ws.parse_next(input)?;
    cut_err(':').parse_next(input)?;

    let composite = cut_err(preceded(kw("composite"), key))
        .context(StrContext::Expected(StrContextValue::Description(
            "composite field",
        )))
        .parse_next(input)?;
    let base = cut_err(preceded(kw("base"), string_literal))
        .context(StrContext::Expected(StrContextValue::Description(
            "base token",
        )))
        .parse_next(input)?;
    let separator = opt(preceded(kw("separator"), cut_err(string_literal))).parse_next(input)?;
    let members: Vec<(String, String)> = cut_err(repeat(1.., member))
        .context(StrContext::Expected(StrContextValue::Description(
            "group member",
        )))
        .parse_next(input)?;

    let mut group = ExclusiveGroup::new(&name, &composite, &base);
    if let Some(sep) = separator {
        group = group.separator(&sep);
    }
    Ok(members
        .into_iter()
        .fold(group, |g, (key, token)| g.member(&key, &token)))
}

// -- Injections -------------------------------------------------------------

#[derive(Clone)]
enum InjectLine {
    Field(String, Value),
    Markup(String),
    Hidden,
}

fn inject_line(input: &mut &str) -> ModalResult<InjectLine> {
    alt((
        preceded(kw("field"), cut_err((key, preceded((ws, '='), literal))))
            .map(|(key, value)| InjectLine::Field(key, value)),
        preceded(kw("markup"), cut_err(string_literal)).map(InjectLine::Markup),
        kw("hidden").value(InjectLine::Hidden),
    ))
    .parse_next(input)
}

fn inject_def(input: &mut &str) -> ModalResult<Markup> {
    keyword(input, "inject")?;

    let element = cut_err(key).parse_next(input)?;
    let anchor = cut_err(preceded(kw("after"), key))
        .context(StrContext::Expected(StrContextValue::Description(
            "after clause",
        )))
        .parse_next(input)?;
    ws.parse_next(input)?;
    cut_err(':').parse_next(input)?;

    let lines: Vec<InjectLine> = repeat(0.., inject_line).parse_next(input)?;
    Ok(lines
        .into_iter()
        .fold(Markup::new(&element, &anchor), |m, line| match line {
            InjectLine::Field(key, value) => m.field(&key, value),
            InjectLine::Markup(html) => m.html(&html),
            InjectLine::Hidden => m.hidden(),
        }))
}

// -- Top-level parser -------------------------------------------------------

enum Item {
    Rule(Rule),
    Group(ExclusiveGroup),
    Inject(Markup),
}

pub fn parse_form(input: &mut &str) -> ModalResult<ParsedForm> {
    let items: Vec<Item> = repeat(
        0..,
        alt((
            rule_def.map(Item::Rule),
            group_def.map(Item::Group),
            inject_def.map(Item::Inject),
        )),
    )
    .parse_next(input)?;

    ws.parse_next(input)?;

    let mut parsed = ParsedForm::default();
    for item in items {
        match item {
            Item::Rule(rule) => parsed.rules.push(rule),
            Item::Group(group) => parsed.groups.push(group),
            Item::Inject(markup) => parsed.injections.push(markup),
        }
    }
    Ok(parsed)
}
