use axml_fmt::{
    config::{FormatOptions, LineBreak},
    doc::Doc,
    format_text,
    script::format_expression,
    template::{self, SpanKind},
    FormatError, Hints, SyntaxErrorKind,
};
use std::convert::Infallible;

fn format(code: &str) -> String {
    format_text(code, &Default::default(), format_expression).unwrap()
}

fn format_with(code: &str, options: &FormatOptions) -> String {
    format_text(code, options, format_expression).unwrap()
}

#[test]
fn spans_cover_whole_input() {
    for raw in [
        "plain text",
        "a {{ b }} c",
        "{{ {a: {b: 1}} }}{{ '}}' }}",
        "{{x}}{{y}} and {{ `z${w}` }}",
        "{{ unterminated",
    ] {
        let spans = template::tokenize_or_text(raw);
        let mut end = 0;
        for span in &spans {
            assert_eq!(span.start, end, "spans of {raw:?} should be contiguous");
            end = span.end;
        }
        assert_eq!(end, raw.len(), "spans of {raw:?} should reach the end");
    }
}

#[test]
fn nested_object_is_one_expression() {
    let spans = template::tokenize("{{ {a: {b: 1}} }}").unwrap();
    assert_eq!(spans.len(), 1);
    assert_eq!(spans[0].kind, SpanKind::Expression);
    assert_eq!(spans[0].content, " {a: {b: 1}} ");
}

#[test]
fn formatting_is_idempotent() {
    let narrow = FormatOptions {
        layout: axml_fmt::config::LayoutOptions {
            print_width: 30,
            ..Default::default()
        },
        ..Default::default()
    };
    for code in [
        r#"<view a:if="{{ list.length > 0 }}"><text a:for="{{ list }}">{{ item.name }}</text></view>"#,
        "<view>\n  text  with   spaces\n\n\n  {{ a ? b : c }}\n</view>\n",
        r#"<template is="row" data="{{ ...item, index, selected: index === current }}" />"#,
        "<!-- comment --><view />",
        "<view>   </view>",
        "<view>{{}}</view>",
        "<view>{{ }}<text /></view>",
        "<view>\n\n</view>",
        "<view>{{ a // trailing\n }}</view>",
    ] {
        let once = format(code);
        similar_asserts::assert_eq!(once, format(&once));
        let once = format_with(code, &narrow);
        similar_asserts::assert_eq!(once, format_with(&once, &narrow));
    }
}

#[test]
fn string_literal_is_kept_verbatim() {
    assert_eq!(
        format(r#"<view attr="{{ 'hello' }}" />"#),
        "<view attr=\"{{'hello'}}\" />\n"
    );
    assert_eq!(
        format(r#"<text>{{ "a  b" }}</text>"#),
        "<text>{{\"a  b\"}}</text>\n"
    );
}

#[test]
fn naked_object_loses_synthetic_braces() {
    assert_eq!(
        format(r#"<template data="{{a: 1, b: 2}}" />"#),
        "<template data=\"{{a: 1, b: 2}}\" />\n"
    );

    let options = FormatOptions {
        layout: axml_fmt::config::LayoutOptions {
            print_width: 12,
            ..Default::default()
        },
        ..Default::default()
    };
    let output = format_with(r#"<template data="{{a: 1, b: 2}}" />"#, &options);
    assert!(!output.contains("{{{"), "synthetic brace is left in:\n{output}");
    let indent_of = |member: &str| {
        output
            .lines()
            .find(|line| line.trim_start().starts_with(member))
            .map(|line| line.len() - line.trim_start().len())
    };
    assert!(indent_of("a: 1").is_some());
    assert_eq!(indent_of("a: 1"), indent_of("b: 2"));
}

#[test]
fn object_in_other_attribute_keeps_braces() {
    assert_eq!(
        format(r#"<view class="{{ {a: 1} }}" />"#),
        "<view class=\"{{{a: 1}}}\" />\n"
    );
}

#[test]
fn whitespace_collapses_but_blank_line_stays() {
    let output = format("<view><text>x</text>  a\n\n\n  b  <text>y</text></view>");
    assert_eq!(
        output,
        "<view>\n  <text>x</text>\n  a\n\n  b\n  <text>y</text>\n</view>\n"
    );
}

#[test]
fn empty_element_is_self_closed() {
    let output = format(r#"<image src="a.png"></image>"#);
    assert_eq!(output, "<image src=\"a.png\" />\n");
    assert!(!output.contains("</image>"));
}

#[test]
fn element_with_nothing_to_print_is_self_closed() {
    assert_eq!(format("<view>   </view>"), "<view />\n");
    assert_eq!(format("<view>{{}}</view>"), "<view />\n");
    assert_eq!(format("<view>{{ }}<text /></view>"), "<view><text /></view>\n");
}

#[test]
fn trailing_line_comment_leaves_no_blank_line() {
    assert_eq!(
        format("<view>{{ a // trailing\n }}</view>"),
        "<view>\n  {{\n    a // trailing\n  }}\n</view>\n"
    );
}

#[test]
fn unparsable_expression_is_kept_without_formatter() -> anyhow::Result<()> {
    let output = format_text(
        "<text>{{ a b }}</text>",
        &Default::default(),
        |_, _| Err::<Doc<'static>, _>("should not be called"),
    )
    .map_err(anyhow::Error::msg)?;
    assert_eq!(output, "<text>{{a b}}</text>\n");
    Ok(())
}

#[test]
fn leading_terminator_from_formatter_is_removed() -> anyhow::Result<()> {
    let output = format_text(
        "<text>{{ [1, 2] }}</text>",
        &Default::default(),
        |_, _| Ok::<_, Infallible>(Doc::list(vec![Doc::text(";"), Doc::text("[1, 2]")])),
    )?;
    assert!(!output.contains(';'), "terminator is left in:\n{output}");
    assert_eq!(output, "<text>{{[1, 2]}}</text>\n");
    Ok(())
}

#[test]
fn parenthesized_object_from_formatter_is_unwrapped() -> anyhow::Result<()> {
    // what an ASI-aware formatter prints for `({ a: 1, b: 2 })`
    let wrapped_object = || {
        Doc::list(vec![
            Doc::text("("),
            Doc::list(vec![
                Doc::text("{"),
                Doc::list(vec![
                    Doc::line(),
                    Doc::text("a: 1"),
                    Doc::text(","),
                    Doc::line(),
                    Doc::text("b: 2"),
                ])
                .indent(),
                Doc::line(),
                Doc::text("}"),
            ])
            .group(),
            Doc::text(")"),
        ])
    };
    let options = FormatOptions {
        layout: axml_fmt::config::LayoutOptions {
            print_width: 12,
            ..Default::default()
        },
        ..Default::default()
    };
    let output = format_text(r#"<template data="{{a: 1, b: 2}}" />"#, &options, |_, _| {
        Ok::<_, Infallible>(wrapped_object())
    })?;
    assert!(!output.contains('('), "parens are left in:\n{output}");
    assert!(!output.contains(')'), "parens are left in:\n{output}");
    assert!(!output.contains("{{{"), "synthetic brace is left in:\n{output}");
    assert!(!output.contains("}}}"), "synthetic brace is left in:\n{output}");
    let indent_of = |member: &str| {
        output
            .lines()
            .find(|line| line.trim_start().starts_with(member))
            .map(|line| line.len() - line.trim_start().len())
    };
    assert!(indent_of("a: 1").is_some());
    assert_eq!(indent_of("a: 1"), indent_of("b: 2"));
    Ok(())
}

#[test]
fn leading_comment_is_hoisted() {
    assert_eq!(
        format("<text>{{ /* note */ x + 1 }}</text>"),
        "<text>\n  {{\n    /* note */\n    x + 1\n  }}\n</text>\n"
    );
}

#[test]
fn directive_is_rejected() {
    let error = format_text(
        "<?xml version=\"1.0\"?>\n<view />",
        &Default::default(),
        format_expression,
    )
    .unwrap_err();
    assert!(matches!(
        error,
        FormatError::UnknownNodeKind {
            kind: "directive",
            pos: 0
        }
    ));
}

#[test]
fn mismatched_close_tag_is_syntax_error() {
    let error = format_text("<view></text>", &Default::default(), format_expression).unwrap_err();
    let FormatError::Syntax(error) = error else {
        panic!("expected syntax error, got {error:?}");
    };
    assert!(matches!(error.kind, SyntaxErrorKind::ExpectCloseTag));
}

#[test]
fn external_formatter_failure_is_reported() {
    let error = format_text("<view>{{ a }}</view>", &Default::default(), |_, _| {
        Err::<Doc<'static>, _>("nope")
    })
    .unwrap_err();
    let FormatError::External(error, code, pos) = error else {
        panic!("expected external error, got {error:?}");
    };
    assert_eq!(error, "nope");
    assert_eq!(code, "a");
    assert_eq!(pos, 9);
}

#[test]
fn naked_object_is_sent_with_braces() -> anyhow::Result<()> {
    let mut received = vec![];
    format_text(
        r#"<template data="{{a: 1}}" />"#,
        &Default::default(),
        |code, hints| {
            received.push((code.to_owned(), hints.naked_object));
            format_expression(code, hints)
        },
    )?;
    assert_eq!(received, [("{a: 1}".to_owned(), true)]);
    Ok(())
}

#[test]
fn hints_follow_indentation() -> anyhow::Result<()> {
    let mut received = vec![];
    format_text(
        "<view><text>{{ a }}</text></view>",
        &Default::default(),
        |code, hints| {
            received.push(hints.clone());
            format_expression(code, hints)
        },
    )?;
    assert_eq!(
        received,
        [Hints {
            print_width: 74,
            indent_width: 2,
            bracket_spacing: false,
            semicolons: false,
            trailing_comma: false,
            naked_object: false,
        }]
    );
    Ok(())
}

#[test]
fn formatter_output_can_be_reflowed() -> anyhow::Result<()> {
    let output = format_text(
        "<text>{{ abc }}</text>",
        &Default::default(),
        |code, _| Ok::<_, Infallible>(Doc::reflow(&code.to_uppercase())),
    )?;
    assert_eq!(output, "<text>{{ABC}}</text>\n");
    Ok(())
}

#[test]
fn tabs_and_crlf() {
    let options = FormatOptions {
        layout: axml_fmt::config::LayoutOptions {
            print_width: 10,
            use_tabs: true,
            line_break: LineBreak::Crlf,
            ..Default::default()
        },
        ..Default::default()
    };
    assert_eq!(
        format_with("<view><text>hello</text></view>", &options),
        "<view>\r\n\t<text>\r\n\t\thello\r\n\t</text>\r\n</view>\r\n"
    );
}

#[test]
fn bracket_spacing_pads_interpolation() {
    let mut options = FormatOptions::default();
    options.language.bracket_spacing = true;
    assert_eq!(
        format_with("<text>{{a+b}}</text>", &options),
        "<text>{{ a+b }}</text>\n"
    );
}
