use auto_testid_swc::{transform, try_transform, Config, PartialConfig, TransformError};

fn run(source: &str, path: &str) -> String {
    transform(source, path, &PartialConfig::default())
}

fn run_with(source: &str, path: &str, options: PartialConfig) -> String {
    transform(source, path, &options)
}

// -----------------------------------------------------------------------------
// Basic tagging
// -----------------------------------------------------------------------------

#[test]
fn function_component_element() {
    let out = run("function Greeting() { return <div>hi</div>; }", "Greeting.jsx");
    assert_eq!(out, r#"function Greeting() { return <div data-testid="Greeting.div">hi</div>; }"#);
}

#[test]
fn list_items_get_a_dynamic_identifier() {
    let src = "function List() { return <ul>{items.map((x, i) => <li key={i}>{x}</li>)}</ul>; }";
    let out = run(src, "List.jsx");
    assert_eq!(
        out,
        "function List() { return <ul data-testid=\"List.ul\">{items.map((x, i) => \
         <li key={i} data-testid={`List.ul.items.item.${i}`}>{x}</li>)}</ul>; }"
    );
}

#[test]
fn skipped_element_with_existing_attribute_is_untouched() {
    let src = r#"<img data-testid="keep" src="x.png" />"#;
    assert_eq!(run(src, "a.jsx"), src);
}

#[test]
fn nested_parent_element_is_part_of_the_path() {
    let out = run("function A() { return <div data-testid=\"X\"><span/></div>; }", "A.jsx");
    assert_eq!(
        out,
        r#"function A() { return <div data-testid="X"><span data-testid="A.div.span"/></div>; }"#
    );
}

#[test]
fn elements_outside_components_are_still_tagged() {
    let out = run("const el = <footer/>;", "el.jsx");
    assert_eq!(out, r#"const el = <footer data-testid="footer"/>;"#);

    let out = run("function renderRow() { return <tr/>; }", "rows.jsx");
    assert_eq!(out, r#"function renderRow() { return <tr data-testid="tr"/>; }"#);
}

// -----------------------------------------------------------------------------
// Owner resolution
// -----------------------------------------------------------------------------

#[test]
fn arrow_assigned_to_const() {
    let out = run("const Nav = () => <nav><a href=\"/\">home</a></nav>;", "Nav.jsx");
    assert_eq!(
        out,
        r#"const Nav = () => <nav data-testid="Nav.nav"><a href="/" data-testid="Nav.nav.a">home</a></nav>;"#
    );
}

#[test]
fn wrapper_calls_are_transparent() {
    let out = run(
        "const Card = memo(({ title }) => <article><h2>{title}</h2></article>);",
        "Card.jsx",
    );
    assert_eq!(
        out,
        r#"const Card = memo(({ title }) => <article data-testid="Card.article"><h2 data-testid="Card.article.h2">{title}</h2></article>);"#
    );

    let out = run(
        "export const Input = React.forwardRef((props, ref) => <input ref={ref} {...props} />);",
        "Input.jsx",
    );
    assert_eq!(
        out,
        r#"export const Input = React.forwardRef((props, ref) => <input ref={ref} {...props} data-testid="Input.input" />);"#
    );
}

#[test]
fn nested_components_contribute_in_lexical_order() {
    let src = "function Outer() { const Inner = () => <span/>; return <div><Inner/></div>; }";
    let out = run(src, "Outer.jsx");
    assert_eq!(
        out,
        "function Outer() { const Inner = () => <span data-testid=\"Outer.Inner.span\"/>; \
         return <div data-testid=\"Outer.div\"><Inner data-testid=\"Outer.div.Inner\"/></div>; }"
    );
}

#[test]
fn object_keys_methods_and_assignments_name_owners() {
    let out = run("const views = { Home: () => <main/> };", "views.jsx");
    assert_eq!(out, r#"const views = { Home: () => <main data-testid="Home.main"/> };"#);

    let out = run("const views = { Profile() { return <section/>; } };", "views.jsx");
    assert_eq!(
        out,
        r#"const views = { Profile() { return <section data-testid="Profile.section"/>; } };"#
    );

    let out = run("let Banner; Banner = () => <header/>;", "Banner.jsx");
    assert_eq!(out, r#"let Banner; Banner = () => <header data-testid="Banner.header"/>;"#);
}

#[test]
fn function_expressions_name_owners() {
    let out = run("const Panel = function () { return <aside/>; };", "Panel.jsx");
    assert_eq!(out, r#"const Panel = function () { return <aside data-testid="Panel.aside"/>; };"#);

    let out = run("export default (function Sheet() { return <table/>; });", "Sheet.jsx");
    assert_eq!(out, r#"export default (function Sheet() { return <table data-testid="Sheet.table"/>; });"#);
}

#[test]
fn typescript_wrappers_around_components() {
    let out = run("const Tile = (() => <figure/>) as FC;", "Tile.tsx");
    assert_eq!(out, r#"const Tile = (() => <figure data-testid="Tile.figure"/>) as FC;"#);

    let out = run("const Badge = ((props) => <span/>) satisfies FC;", "Badge.tsx");
    assert_eq!(out, r#"const Badge = ((props) => <span data-testid="Badge.span"/>) satisfies FC;"#);
}

#[test]
fn event_handlers_do_not_become_owners() {
    let src = "function Btn() { const onClick = () => null; return <button onClick={() => null}>x</button>; }";
    let out = run(src, "Btn.jsx");
    assert!(out.contains(r#"<button onClick={() => null} data-testid="Btn.button">"#), "{out}");
}

#[test]
fn component_element_named_like_its_owner() {
    let out = run("function Tree() { return <Tree/>; }", "Tree.jsx");
    assert_eq!(out, r#"function Tree() { return <Tree data-testid="Tree"/>; }"#);
}

// -----------------------------------------------------------------------------
// Repetition contexts
// -----------------------------------------------------------------------------

#[test]
fn callback_without_index_falls_back_to_key() {
    let src = "function T() { return <ul>{rows.map(row => <li key={row.id}>{row.name}</li>)}</ul>; }";
    let out = run(src, "T.jsx");
    assert!(
        out.contains("<li key={row.id} data-testid={`T.ul.rows.item.${row.id}`}>"),
        "{out}"
    );
}

#[test]
fn callback_without_index_or_key_stays_static() {
    let src = "function T() { return <ul>{rows.map(row => <li>{row}</li>)}</ul>; }";
    let out = run(src, "T.jsx");
    assert!(out.contains(r#"<li data-testid="T.ul.rows.item">"#), "{out}");
}

#[test]
fn elements_nested_inside_an_item_share_the_index() {
    let src = "function Menu() { return <ul>{items.map((item, idx) => <li key={item.id}><span>{item.label}</span></li>)}</ul>; }";
    let out = run(src, "Menu.jsx");
    assert!(out.contains("data-testid={`Menu.ul.items.item.${idx}`}"), "{out}");
    assert!(out.contains("<span data-testid={`Menu.li.items.item.${idx}`}>"), "{out}");
}

#[test]
fn member_receivers_and_reduce() {
    let src = "function U(props) { return <div>{props.users.map((u, n) => <p key={n}>{u}</p>)}</div>; }";
    let out = run(src, "U.jsx");
    assert!(out.contains("<p key={n} data-testid={`U.div.users.item.${n}`}>"), "{out}");

    let src = "function R() { return <div>{list.reduce((acc, entry, pos) => acc.concat(<em key={pos}/>), [])}</div>; }";
    let out = run(src, "R.jsx");
    assert!(out.contains("<em key={pos} data-testid={`R.div.list.item.${pos}`}/>"), "{out}");
}

#[test]
fn receiver_is_outside_the_loop() {
    let src = "function W() { return <div>{getRows(<Header/>).map((r, i) => <Row key={i}/>)}</div>; }";
    let out = run(src, "W.jsx");
    assert!(out.contains(r#"<Header data-testid="W.div.Header"/>"#), "{out}");
    assert!(out.contains("<Row key={i} data-testid={`W.div.item.${i}`}/>"), "{out}");
}

#[test]
fn every_iteration_method_opens_a_loop() {
    let src = "function Fl() { return <div>{rows.filter((row, n) => row.on && <p key={n}/>)}</div>; }";
    let out = run(src, "Fl.jsx");
    assert!(out.contains("<p key={n} data-testid={`Fl.div.rows.item.${n}`}/>"), "{out}");

    let src = "function Fe() { const out = []; rows.forEach((row, n) => { out.push(<li key={n}/>); }); return <ul>{out}</ul>; }";
    let out = run(src, "Fe.jsx");
    assert!(out.contains("<li key={n} data-testid={`Fe.rows.item.${n}`}/>"), "{out}");
    assert!(out.contains(r#"<ul data-testid="Fe.ul">"#), "{out}");

    let src = "function Fm() { return <dl>{rows.flatMap((row, n) => [<dt key={n}/>, <dd/>])}</dl>; }";
    let out = run(src, "Fm.jsx");
    assert!(out.contains("<dt key={n} data-testid={`Fm.dl.rows.item.${n}`}/>"), "{out}");
    assert!(out.contains("<dd data-testid={`Fm.dl.rows.item.${n}`}/>"), "{out}");
}

#[test]
fn optional_chained_iteration_is_a_loop() {
    let src = "function L() { return <ul>{items?.map((x, i) => <li key={i}>{x}</li>)}</ul>; }";
    let out = run(src, "L.jsx");
    assert!(out.contains("<li key={i} data-testid={`L.ul.items.item.${i}`}>"), "{out}");

    let src = "function P(props) { return <ol>{props?.users?.map((u, n) => <li key={n}/>)}</ol>; }";
    let out = run(src, "P.jsx");
    assert!(out.contains("<li key={n} data-testid={`P.ol.users.item.${n}`}/>"), "{out}");

    let src = "function M() { return <ol>{rows.map?.((r, n) => <li key={n}/>)}</ol>; }";
    let out = run(src, "M.jsx");
    assert!(out.contains("<li key={n} data-testid={`M.ol.rows.item.${n}`}/>"), "{out}");
}

#[test]
fn optional_index_param_keeps_only_its_name() {
    let src = "const Opts = () => <ul>{xs.map((x: string, i?: number) => <li/>)}</ul>;";
    let out = run(src, "Opts.tsx");
    assert!(out.contains("<li data-testid={`Opts.ul.xs.item.${i}`}/>"), "{out}");
}

#[test]
fn typescript_generics_and_annotated_params() {
    let src = r#"export function Table<T>(props: { rows: T[] }) {
  const [sel, setSel] = useState<string>("");
  return <table>{props.rows.map((row: T, index: number) => <tr key={index} />)}</table>;
}"#;
    let out = run(src, "Table.tsx");
    assert!(out.contains(r#"useState<string>("")"#), "{out}");
    assert!(out.contains(r#"<table data-testid="Table.table">"#), "{out}");
    assert!(
        out.contains("<tr key={index} data-testid={`Table.table.rows.item.${index}`} />"),
        "{out}"
    );
}

// -----------------------------------------------------------------------------
// Options
// -----------------------------------------------------------------------------

#[test]
fn skip_list_applies_at_any_depth() {
    let src = "function G() { return <div><br/><hr/><svg><img/></svg></div>; }";
    let out = run(src, "G.jsx");
    assert_eq!(out.matches("data-testid").count(), 1, "{out}");
    assert!(out.contains(r#"<div data-testid="G.div">"#));
}

#[test]
fn only_interactive_elements() {
    let src = "function F() { return <form><div><input/><button>go</button></div></form>; }";
    let out = run_with(
        src,
        "F.jsx",
        PartialConfig { only_interactive: Some(true), ..Default::default() },
    );
    assert_eq!(
        out,
        r#"function F() { return <form data-testid="F.form"><div><input data-testid="F.div.input"/><button data-testid="F.div.button">go</button></div></form>; }"#
    );
}

#[test]
fn separator_substitution() {
    let src = "function Greeting() { return <div><p>hi</p></div>; }";
    let dotted = run(src, "Greeting.jsx");
    let dashed = run_with(
        src,
        "Greeting.jsx",
        PartialConfig { separator: Some("-".into()), ..Default::default() },
    );
    assert_eq!(dashed, dotted.replace("Greeting.div", "Greeting-div").replace("Greeting-div.p", "Greeting-div-p"));
    assert!(dashed.contains(r#"data-testid="Greeting-div-p""#), "{dashed}");
}

#[test]
fn custom_attribute_name_and_flat_paths() {
    let src = "function Greeting() { return <div><p>hi</p></div>; }";
    let out = run_with(
        src,
        "Greeting.jsx",
        PartialConfig {
            attribute_name: Some("data-qa".into()),
            use_hierarchy: Some(false),
            ..Default::default()
        },
    );
    assert_eq!(out, r#"function Greeting() { return <div data-qa="div"><p data-qa="p">hi</p></div>; }"#);
}

#[test]
fn overwrite_existing_when_not_respected() {
    let src = r#"function A() { return <div data-testid="X" id="a">x</div>; }"#;
    let out = run_with(
        src,
        "A.jsx",
        PartialConfig { respect_existing: Some(false), ..Default::default() },
    );
    assert_eq!(out, r#"function A() { return <div data-testid="A.div" id="a">x</div>; }"#);
}

#[test]
fn disabled_is_identity() {
    let src = "function Greeting() { return <div>hi</div>; }";
    let out = run_with(src, "Greeting.jsx", PartialConfig { enabled: Some(false), ..Default::default() });
    assert_eq!(out, src);
}

// -----------------------------------------------------------------------------
// Pass-through and failure
// -----------------------------------------------------------------------------

#[test]
fn non_markup_files_pass_through() {
    let src = "export const add = (a, b) => a + b;";
    assert_eq!(run(src, "math.js"), src);
}

#[test]
fn markup_without_eligible_elements_is_unchanged() {
    let src = "function Icon() { return <svg><br/></svg>; }";
    assert_eq!(run(src, "Icon.jsx"), src);
}

#[test]
fn unparsable_source_is_returned_unchanged() {
    let src = "function A() { return <div>; }";
    assert_eq!(run(src, "A.jsx"), src);
    assert!(matches!(
        try_transform(src, "A.jsx", &Config::default()),
        Err(TransformError::Parse { .. })
    ));
}

#[test]
fn plain_typescript_files_do_not_accept_markup() {
    let src = "export const view = <div>hi</div>;";
    assert_eq!(run(src, "view.ts"), src);
    assert!(matches!(
        try_transform(src, "view.ts", &Config::default()),
        Err(TransformError::Parse { .. })
    ));

    let src = "export const n = parse<number>(raw);";
    assert_eq!(run(src, "util.ts"), src);
}

#[test]
fn leading_byte_order_mark_is_preserved() {
    let out = run("\u{feff}function A() { return <div><p>x</p></div>; }", "A.jsx");
    assert_eq!(
        out,
        "\u{feff}function A() { return <div data-testid=\"A.div\"><p data-testid=\"A.div.p\">x</p></div>; }"
    );

    let out = run("\u{feff}const B = () => <a><b></b></a>;", "B.jsx");
    assert_eq!(out, "\u{feff}const B = () => <a data-testid=\"B.a\"><b data-testid=\"B.a\"></b></a>;");
}

#[test]
fn transform_is_idempotent() {
    let src = "function List() { return <ul>{items.map((x, i) => <li key={i}>{x}</li>)}</ul>; }";
    let once = run(src, "List.jsx");
    let twice = run(&once, "List.jsx");
    assert_eq!(once, twice);
}

#[test]
fn already_tagged_input_is_a_fixed_point() {
    let src = r#"function A() { return <div data-testid="a"><span data-testid="b"/></div>; }"#;
    assert_eq!(run(src, "A.jsx"), src);
}

#[test]
fn files_transform_independently_across_threads() {
    let sources: Vec<String> = (0..8)
        .map(|n| format!("function C{n}() {{ return <div>{{xs.map((x, i) => <p key={{i}}/>)}}</div>; }}"))
        .collect();
    let expected: Vec<String> = sources.iter().map(|s| run(s, "C.jsx")).collect();
    let actual: Vec<String> = std::thread::scope(|s| {
        let handles: Vec<_> = sources.iter().map(|src| s.spawn(move || run(src, "C.jsx"))).collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert_eq!(actual, expected);
    assert!(actual[3].contains(r#"<div data-testid="C3.div">"#));
}

#[test]
fn multi_line_file_keeps_its_formatting() {
    let src = r#"import React from "react";

// Navigation bar
export default function Navigation({ links }) {
  return (
    <nav className="top">
      <ul>
        {links.map((link, index) => (
          <li key={link.href}>
            <a href={link.href}>{link.label}</a>
          </li>
        ))}
      </ul>
      <button
        type="button"
        onClick={() => console.log("x")}
      >
        Menu
      </button>
    </nav>
  );
}"#;
    let out = run(src, "Navigation.jsx");
    insta::assert_snapshot!(out, @r###"
    import React from "react";

    // Navigation bar
    export default function Navigation({ links }) {
      return (
        <nav className="top" data-testid="Navigation.nav">
          <ul data-testid="Navigation.nav.ul">
            {links.map((link, index) => (
              <li key={link.href} data-testid={`Navigation.ul.links.item.${index}`}>
                <a href={link.href} data-testid={`Navigation.li.links.item.${index}`}>{link.label}</a>
              </li>
            ))}
          </ul>
          <button
            type="button"
            onClick={() => console.log("x")} data-testid="Navigation.nav.button"
          >
            Menu
          </button>
        </nav>
      );
    }
    "###);
}
