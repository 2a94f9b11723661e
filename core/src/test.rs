//! Tests for the Tessera Templating Engine.
// Copyright (C) 2024  Frankie Baffa
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use {
    crate::{
        assets::{
            front_scripts,
            HtmlResponse,
        },
        context::Value,
        error::{
            Error,
            Result,
        },
        file::MemoryLoader,
        options::{
            Options,
            INLINE_ELEMENTS,
            LITERAL_ATTRIBUTES,
            LITERAL_ELEMENTS,
            VOID_ELEMENTS,
        },
        parser::Parser,
        path::{
            app_url,
            front_asset,
            include_target,
        },
        stringify::Stringify,
    },
    serde_json::{
        json,
        Value as JsonValue,
    },
    std::{
        env::current_dir,
        path::PathBuf,
        sync::{
            Arc,
            Mutex,
        },
    },
};

fn render(data: JsonValue, template: &str) -> String {
    Parser::new(data).parse_buffer(template).unwrap()
}

fn site() -> MemoryLoader {
    let mut loader = MemoryLoader::new();
    loader
        .insert("/site/card.html", "<b>{name}</b>")
        .insert("/site/node_modules/@scope/lib.html", "<i>lib</i>")
        .insert("/site/full.html", "<!DOCTYPE html><html><body>Full</body></html>")
        .insert("/site/page.html", "<html><body>{./full.html}</body></html>")
        .insert("/site/layout.html", "<html><head><title>Site</title></head><body>{content}</body></html>")
        .insert("/site/content.html", "<p>Ignored</p><!--BEGIN--><p>{name} {.site}</p><!--END-->")
        .insert(
            "/site/titled.html",
            "<html><head><title>Page</title></head><body><!--BEGIN--><p>Hi</p><!--END--></body></html>",
        )
        .insert("/site/js/page.html", "<script src=\"app.js\"></script>");
    loader
}

fn site_parser(data: JsonValue) -> Parser {
    let mut parser = Parser::new(data);
    parser.options_mut().app_dir = PathBuf::from("/site");
    parser.set_loader(site());
    parser
}

struct French;

impl Stringify for French {
    fn stringify(&self, value: &Value) -> Result<String> {
        Ok(value.to_string())
    }

    fn translate(&self, phrase: &str) -> Result<String> {
        Ok(match phrase {
            "Hello $1!" => "Bonjour $1 !",
            "Welcome" => "Bienvenue",
            "Hello" => "Salut",
            other => other,
        }.to_owned())
    }
}

#[test]
fn whitelists_1() {
    for list in [ INLINE_ELEMENTS, LITERAL_ATTRIBUTES, LITERAL_ELEMENTS, VOID_ELEMENTS, ] {
        assert!(list.windows(2).all(|w| w[0] < w[1]), "{:?}", list);
    }
}

#[test]
fn options_1() {
    let options = Options::read("test/options/1/options.json").unwrap();
    assert!(options.do_expression);
    assert!(options.do_literal);
    assert_eq!(1, options.void_elements.len());
    assert!(options.void_elements.contains("br"));
    assert_eq!(INLINE_ELEMENTS.len(), options.inline_elements.len());
}

#[test]
fn options_2() {
    match Options::read("test/options/1/missing.json") {
        Err(Error::IO(_, p)) => assert!(p.ends_with("missing.json")),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn context_1() {
    let ctx = Value::read("test/context/1/ctx.json").unwrap();
    assert_eq!("Somebody", ctx.get("name").unwrap().as_str().unwrap());
    assert_eq!("31", ctx.get("age").unwrap().to_string());
    assert_eq!("a,b", ctx.get("tags").unwrap().to_string());
    assert_eq!("2", ctx.get("tags").unwrap().get("length").unwrap().to_string());
    assert!(ctx.get("age").unwrap().is_truthy());
    assert!(!ctx.get("empty").unwrap().is_truthy());
    assert!(!ctx.get("zero").unwrap().is_truthy());
    assert!(ctx.get("missing").is_none());
}

#[test]
fn context_2() {
    let ctx = Value::from(json!({ "b": 2, "a": 1 }));
    assert_eq!("2,1", ctx.values().to_string());
    assert_eq!(r#"{"b":2,"a":1}"#, ctx.to_string());
}

#[test]
fn path_1() {
    assert_eq!(
        PathBuf::from("/app/inc/part.html"),
        include_target("/app", "/app/pages", "/inc/part.html"),
    );
    assert_eq!(
        PathBuf::from("/app/node_modules/@scope/lib.html"),
        include_target("/app", "/app/pages", "/@scope/lib.html"),
    );
    assert_eq!(
        PathBuf::from("/app/part.html"),
        include_target("/app", "/app/pages", "../part.html"),
    );
}

#[test]
fn path_2() {
    assert_eq!(Some("/css/site.css".to_owned()), app_url("/app", "/app/css/site.css"));
    assert_eq!(None, app_url("/app", "/elsewhere/site.css"));
    assert_eq!("/pages/site.css", front_asset("/app", "/app/pages", "site.css"));
    assert_eq!("/site.css", front_asset("/app", "/app/pages", "/site.css"));
    assert_eq!("https://cdn/site.css", front_asset("/app", "/app/pages", "https://cdn/site.css"));
}

#[test]
fn expression_1() {
    assert_eq!("<p>Hello World!</p>", render(json!({ "name": "World" }), "<p>Hello {name}!</p>"));
}

#[test]
fn expression_2() {
    let template = r#"<article data-id="{?id0}" data-another="{one}"></article>"#;
    assert_eq!(
        r#"<article data-another="found"></article>"#,
        render(json!({ "id1": 1, "one": "found" }), template),
    );

    let template = r#"<article data-id="{?id1}" data-another="{one}"></article>"#;
    assert_eq!(
        r#"<article data-id="1" data-another="found"></article>"#,
        render(json!({ "id1": 1, "one": "found" }), template),
    );
}

#[test]
fn expression_3() {
    assert_eq!("", render(json!({}), ""));
    assert_eq!("{unterminated", render(json!({}), "{unterminated"));
    assert_eq!("<p>{?unterminated</p>", render(json!({}), "<p>{?unterminated</p>"));
    assert_eq!("a { b } c", render(json!({ "b": 1 }), "a { b } c"));
}

#[test]
fn expression_4() {
    let template = "<p>{name}</p><!--items-->x<!--end-->";
    let mut parser = Parser::new(json!({ "name": "n", "items": [ 1, 2 ] }));
    parser.options_mut().do_expression = false;
    assert_eq!(template, parser.parse_buffer(template).unwrap());
}

#[test]
fn expression_5() {
    let data = json!({ "key": "b", "labels": { "a": "A", "b": "B" } });
    assert_eq!("B", render(data, "{labels.{key}}"));
}

#[test]
fn expression_6() {
    assert_eq!("x", render(json!({}), r#"{"x"}"#));
    assert_eq!("<b></b>", render(json!({}), "<b>{missing}</b>"));
    assert_eq!(
        "WORLD World 5",
        render(json!({ "name": "world" }), "{name.upper} {name.ucFirst} {name.length}"),
    );
}

#[test]
fn expression_7() {
    assert_eq!("x y", render(json!({}), "x {?missing} y"));
    assert_eq!("x N y", render(json!({ "name": "N" }), "x {?name} y"));
}

#[test]
fn expression_8() {
    let data = Value::object([
        ("name", Value::from("Ann")),
        ("greet", Value::function(|this| Ok(this.get("name").unwrap_or_default()))),
    ]);
    assert_eq!("Ann", Parser::new(data).parse_buffer("{greet}").unwrap());
}

#[test]
fn expression_9() {
    let mut parser = Parser::new(json!({}));
    parser.register_resolver('@', |segment, _| Ok(Value::from(segment[1..].to_uppercase())));
    assert_eq!("<p>ABC</p>", parser.parse_buffer("<p>{@abc}</p>").unwrap());
}

#[test]
fn expression_10() {
    assert_eq!(
        "xml-http-request|xml_http_request|xmlHttpRequest|XmlHttpRequest",
        render(
            json!({ "s": "XMLHttpRequest" }),
            "{s.kebab}|{s.snake}|{s.camel}|{s.pascal}",
        ),
    );
    assert_eq!("Ann lee", render(json!({ "s": "ann lee" }), "{s.ucFirst}"));
}

#[test]
fn expression_11() {
    assert_eq!("", render(json!({}), "{?x}bc"));
    assert_eq!("a", render(json!({}), "a {?x}bc"));
    assert_eq!(" d", render(json!({ "x": false }), "{?x}bc d"));
    assert_eq!("Nbc", render(json!({ "x": "N" }), "{?x}bc"));
}

#[test]
fn block_1() {
    let data = Value::read("test/block/1/data.json").unwrap();
    let mut parser = Parser::new(data);
    let output = parser.parse_file("test/block/1/list.html", None::<&str>).unwrap();
    assert_eq!(
        "\n\t\t\t<ul>\n\t\t\t\t<li>Hello1</li>\n\t\t\t\t<li>Hello2</li>\n\t\t\t</ul>\n\t\t",
        output,
    );
}

#[test]
fn block_2() {
    let template = "a<!--?show-->b<!--end-->c";
    assert_eq!("abc", render(json!({ "show": true }), template));
    assert_eq!("ac", render(json!({ "show": false }), template));
    assert_eq!("<i>n</i>", render(json!({ "show": 1, "name": "n" }), "<!--?show--><i>{name}</i><!--end-->"));
}

#[test]
fn block_3() {
    let data = json!({ "title": "T", "items": [ { "name": "a" }, { "name": "b" } ] });
    assert_eq!("aT;bT;", render(data, "<!--items-->{name}{.title};<!--end-->"));
}

#[test]
fn block_4() {
    assert_eq!("12", render(json!({ "map": { "a": 1, "b": 2 } }), "<!--map.*-->{.}<!--end-->"));
    assert_eq!("xz", render(json!({ "list": [] }), "x<!--list-->y<!--end-->z"));
    assert_eq!("xz", render(json!({}), "x<!--missing--><!--inner-->y<!--end--><!--end-->z"));
}

#[test]
fn block_5() {
    assert_eq!("ab", render(json!({}), "a<!--end-->b"));
    assert_eq!("<!-- note -->y", render(json!({ "x": "y" }), "<!-- note -->{x}"));
    assert_eq!("<![CDATA[{x}]]>", render(json!({ "x": "y" }), "<![CDATA[{x}]]>"));
}

#[test]
fn block_6() {
    let template = "x<!--missing-->a<!--BEGIN-->b<!--END-->c<!--end-->z";
    assert_eq!("xz", render(json!({}), template));
    assert_eq!(
        "<!--BEGIN-->b<!--END-->",
        render(json!({ "show": true }), "<!--?show--><!--BEGIN-->b<!--END--><!--end-->"),
    );
}

#[test]
fn tag_1() {
    assert_eq!(
        "<script>let a = {b: 1}</script>y",
        render(json!({ "x": "y" }), "<script>let a = {b: 1}</script>{x}"),
    );
    assert_eq!("<p>a</b></p>", render(json!({}), "<p>a</b></p>"));
    assert_eq!(r#"<a href="/x">go</a>"#, render(json!({ "path": "/x" }), r#"<a href="app://(path)">go</a>"#));
}

#[test]
fn tag_2() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let mut parser = Parser::new(json!({}));
    let hooks = parser.hooks_mut();

    let log = Arc::clone(&events);
    hooks.on_tag_open = Some(Arc::new(move |name: &str| log.lock().unwrap().push(format!("open {name}"))));
    let log = Arc::clone(&events);
    hooks.on_tag_opened = Some(Arc::new(move |name: &str| log.lock().unwrap().push(format!("opened {name}"))));
    let log = Arc::clone(&events);
    hooks.on_tag_close = Some(Arc::new(move |name: &str| log.lock().unwrap().push(format!("close {name}"))));
    let log = Arc::clone(&events);
    hooks.on_attribute = Some(Arc::new(move |name: &str, value: &str| {
        log.lock().unwrap().push(format!("attr {name}={value}"))
    }));

    parser.parse_buffer(r#"<p class="x"><br></p>"#).unwrap();
    assert_eq!(
        vec![ "open p", "attr class=x", "opened p", "open br", "opened br", "close br", "close p", ],
        *events.lock().unwrap(),
    );
}

#[test]
fn tag_3() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let mut parser = Parser::new(json!({}));

    let log = Arc::clone(&events);
    parser.hooks_mut().on_tag_close = Some(Arc::new(move |name: &str| {
        log.lock().unwrap().push(name.to_owned())
    }));

    assert_eq!("<div><p>x", parser.parse_buffer("<div><p>x").unwrap());
    assert_eq!(vec![ "p", "div", ], *events.lock().unwrap());
}

#[test]
fn attribute_block_1() {
    let template = r#"<div data-if="{show}" class="a" data-end>x</div>"#;
    assert_eq!(r#"<div class="a" >x</div>"#, render(json!({ "show": true }), template));
    assert_eq!("<div >x</div>", render(json!({ "show": false }), template));
}

#[test]
fn attribute_block_2() {
    let mut parser = Parser::new(json!({ "show": false }));
    match parser.parse_buffer(r#"<div data-if="{show}">x</div>"#) {
        Err(Error::UnterminatedAttributeBlock(c, _)) => {
            assert_eq!(0, c.line());
            assert_eq!(5, c.position());
        },
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn literal_1() {
    let mut parser = Parser::new(json!({ "name": "W" }));
    parser.options_mut().do_literal = true;
    assert_eq!(
        "<p>Hello <b>W</b>!</p>",
        parser.parse_buffer("<p>Hello <b>{name}</b>!</p>").unwrap(),
    );
}

#[test]
fn literal_2() {
    let mut parser = Parser::new(json!({ "name": "W" }));
    parser.options_mut().do_literal = true;
    parser.set_stringify(French);
    assert_eq!(
        "<p>Bonjour <b>W</b> !</p><h1>Bienvenue</h1>",
        parser.parse_buffer("<p>Hello <b>{name}</b>!</p><h1>Welcome</h1>").unwrap(),
    );
}

#[test]
fn literal_3() {
    let mut parser = Parser::new(json!({}));
    parser.options_mut().do_literal = true;
    parser.set_stringify(French);
    assert_eq!(
        r#"<p title="Salut">x</p>"#,
        parser.parse_buffer(r#"<p title="Hello">x</p>"#).unwrap(),
    );
}

#[test]
fn literal_4() {
    let mut parser = Parser::new(json!({}));
    parser.options_mut().do_literal = true;
    parser.set_stringify(French);
    assert_eq!(
        "<address><p>Hello</p></address><p>Salut</p>",
        parser.parse_buffer("<address><p>Hello</p></address><p>Hello</p>").unwrap(),
    );
}

#[test]
fn literal_5() {
    let mut parser = Parser::new(json!({ "a": "$2", "b": "x" }));
    parser.options_mut().do_literal = true;
    assert_eq!("<p>x and x</p>", parser.parse_buffer("<p>{a} and {b}</p>").unwrap());

    let mut parser = Parser::new(json!({ "n": "$1" }));
    parser.options_mut().do_literal = true;
    parser.set_stringify(French);
    assert_eq!("<p>Bonjour $1 !</p>", parser.parse_buffer("<p>Hello {n}!</p>").unwrap());
}

#[test]
fn include_1() {
    let mut parser = Parser::new(json!({}));
    parser.options_mut().app_dir = current_dir().unwrap().join("test/include/1");
    let output = parser.parse_file("test/include/1/page.html", None::<&str>).unwrap();
    assert_eq!(
        concat!(
            "<!DOCTYPE html>\n<html>\n<head>\n",
            "<link href=\"/style.css\" rel=\"stylesheet\">\n",
            "\t<link href=\"/part.css\" rel=\"stylesheet\">\n",
            "</head>\n<body>\n",
            "\n<p>Part</p>\n\n",
            "\n<p>Part</p>\n\n",
            "</body>\n</html>\n",
        ),
        output,
    );
    assert_eq!(
        vec![
            "<link href=\"/part.css\" rel=\"stylesheet\">".to_owned(),
            "<link href=\"/style.css\" rel=\"stylesheet\">".to_owned(),
        ],
        parser.head_links(),
    );
}

#[test]
fn include_2() {
    let data = json!({ "name": "Root", "user": { "name": "Ann" } });
    assert_eq!(
        "<p><b>Ann</b></p>",
        site_parser(data.clone()).parse_buffer("<p>{./card.html(user)}</p>").unwrap(),
    );
    assert_eq!(
        "<p><b>Ann</b></p>",
        site_parser(data.clone()).parse_buffer("<p>{/card.html(user)}</p>").unwrap(),
    );
    assert_eq!(
        "<b>Ann</b>|<b>Root</b>",
        site_parser(data.clone()).parse_buffer("<!--user-->{./card.html}|{./card.html-}<!--end-->").unwrap(),
    );
    assert_eq!(
        "<i>lib</i>",
        site_parser(data).parse_buffer("{/@scope/lib.html}").unwrap(),
    );
}

#[test]
fn include_3() {
    let mut parser = site_parser(json!({}));
    assert_eq!(
        "<!DOCTYPE html><html><body>Full</body></html>",
        parser.parse_file("/site/page.html", None::<&str>).unwrap(),
    );
}

#[test]
fn include_4() {
    let mut parser = site_parser(json!({}));
    match parser.parse_buffer("{./nowhere.html}") {
        Err(Error::IO(_, p)) => assert_eq!(PathBuf::from("/site/nowhere.html"), p),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn include_5() {
    let mut loader = site();
    loader
        .insert("/site/a.html", "<html><head><script src=\"shared.js\"></script></head><body><!--BEGIN-->A<!--END--></body></html>")
        .insert("/site/b.html", "<html><head><script src=\"shared.js\"></script></head><body><!--BEGIN-->B<!--END--></body></html>");
    let mut parser = site_parser(json!({}));
    parser.set_loader(loader);

    assert_eq!(
        "<html><head>\n\t<script src=\"/shared.js\"></script></head><body>AB</body></html>",
        parser.parse_buffer("<html><head></head><body>{./a.html}{./b.html}</body></html>").unwrap(),
    );
    assert_eq!(vec![ "<script src=\"/shared.js\"></script>".to_owned(), ], parser.head_links());
    assert!(front_scripts().contains(&"/shared.js".to_owned()));
}

#[test]
fn container_1() {
    let mut parser = Parser::with_container(json!({ "name": "Ann" }), json!({ "site": "S" }));
    parser.options_mut().app_dir = PathBuf::from("/site");
    parser.set_loader(site());
    assert_eq!(
        "<html><head><title>Site</title></head><body><p>Ann S</p></body></html>",
        parser.parse_file("/site/content.html", Some("/site/layout.html")).unwrap(),
    );
}

#[test]
fn container_2() {
    let mut parser = site_parser(json!({}));
    parser.options_mut().do_literal = true;
    assert_eq!(
        "<html><head><title>Page</title></head><body><p>Hi</p></body></html>",
        parser.parse_file("/site/titled.html", Some("/site/layout.html")).unwrap(),
    );
    assert_eq!(Some("Page"), parser.head_title());
}

#[test]
fn response_1() {
    let widget = HtmlResponse::new("<i>w</i>", vec![ "/site/css/widget.css".to_owned(), ]);
    let data = Value::object([ ("widget", Value::from(widget)), ]);
    let mut parser = Parser::new(data);
    parser.options_mut().app_dir = PathBuf::from("/site");

    let output = parser.parse_buffer("<html><head></head><body>{widget}</body></html>").unwrap();
    assert_eq!(
        "<html><head>\n\t<link href=\"/css/widget.css\" rel=\"stylesheet\"></head><body><i>w</i></body></html>",
        output,
    );

    let response = parser.into_response(output);
    assert_eq!(
        &[ "<link href=\"/css/widget.css\" rel=\"stylesheet\">".to_owned(), ],
        response.dependencies(),
    );
}

#[test]
fn response_2() {
    let widget = HtmlResponse::new(
        "<i>w</i>",
        vec![ "<script src=\"/lib/a.js\"></script>".to_owned(), "/site/js/w.js".to_owned(), ],
    );
    let data = Value::object([ ("widget", Value::from(widget)), ]);
    let mut parser = Parser::new(data);
    parser.options_mut().app_dir = PathBuf::from("/site");

    assert_eq!(
        concat!(
            "<html><head>\n\t<script src=\"/js/w.js\" type=\"module\"></script>",
            "\n\t<script src=\"/lib/a.js\"></script></head><body><i>w</i></body></html>",
        ),
        parser.parse_buffer("<html><head></head><body>{widget}</body></html>").unwrap(),
    );
    assert!(front_scripts().contains(&"/lib/a.js".to_owned()));
    assert!(front_scripts().contains(&"/js/w.js".to_owned()));
}

#[test]
fn front_scripts_1() {
    let mut parser = site_parser(json!({}));
    assert_eq!(
        r#"<script src="/js/app.js"></script>"#,
        parser.parse_file("/site/js/page.html", None::<&str>).unwrap(),
    );
    assert!(front_scripts().contains(&"/js/app.js".to_owned()));
}

#[test]
fn clean_1() {
    let mut parser = Parser::new(json!({ "x": 1 }));
    assert!(parser.is_context_clean());
    parser.parse_buffer("<p>{x}</p>").unwrap();
    assert!(parser.is_context_clean());

    let mut parser = Parser::new(json!({}));
    parser.parse_buffer("<head><link href=\"https://cdn/x.css\" rel=\"stylesheet\"></head>").unwrap();
    assert!(!parser.is_context_clean());
}
