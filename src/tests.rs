use crate::{Reader, ReaderBuilder, Record, Writer, WriterBuilder};

fn parse(rdr: &mut ReaderBuilder, data: &str) -> Vec<Vec<String>> {
    let mut rdr = rdr.from_text(data);
    rdr.read_all()
        .unwrap()
        .unwrap_or_default()
        .into_iter()
        .map(Record::into_fields)
        .collect()
}

fn to_strings(rows: Vec<Vec<&str>>) -> Vec<Vec<String>> {
    rows.into_iter()
        .map(|row| row.into_iter().map(|f| f.to_string()).collect())
        .collect()
}

macro_rules! parses_to {
    ($name:ident, $csv:expr, $vec:expr) => {
        parses_to!($name, $csv, $vec, |_| {});
    };
    ($name:ident, $csv:expr, $vec:expr, $config:expr) => {
        #[test]
        fn $name() {
            let mut builder = ReaderBuilder::new();
            $config(&mut builder);
            let got = parse(&mut builder, $csv);
            assert_eq!(got, to_strings($vec));
        }
    };
}

macro_rules! fail_parses_to {
    ($name:ident, $csv:expr, $line:expr) => {
        #[test]
        fn $name() {
            let mut rdr = Reader::from_text($csv);
            let err = rdr.read_all().unwrap_err();
            match err {
                crate::Error::Parse { line, .. } => assert_eq!(line, $line),
                x => panic!("expected parse error but got {:?}", x),
            }
        }
    };
}

macro_rules! writes_as {
    ($name:ident, $vec:expr, $csv:expr) => {
        writes_as!($name, $vec, $csv, |_| {});
    };
    ($name:ident, $vec:expr, $csv:expr, $config:expr) => {
        #[test]
        fn $name() {
            let mut builder = WriterBuilder::new();
            $config(&mut builder);
            let mut wtr = builder.from_memory();
            let rows: Vec<Vec<&str>> = $vec;
            for row in rows {
                wtr.write_record(row).unwrap();
            }
            assert_eq!(wtr.as_str(), $csv);
        }
    };
}

parses_to!(one_row_one_field, "a", vec![vec!["a"]]);
parses_to!(one_row_many_fields, "a,b,c", vec![vec!["a", "b", "c"]]);
parses_to!(one_row_trailing_comma, "a,b,", vec![vec!["a", "b", ""]]);
parses_to!(one_row_one_field_lf, "a\n", vec![vec!["a"]]);
parses_to!(one_row_many_fields_lf, "a,b,c\n", vec![vec!["a", "b", "c"]]);
parses_to!(one_row_trailing_comma_lf, "a,b,\n", vec![vec!["a", "b", ""]]);
parses_to!(one_row_one_field_crlf, "a\r\n", vec![vec!["a"]]);
parses_to!(one_row_many_fields_crlf, "a,b,c\r\n", vec![vec!["a", "b", "c"]]);
parses_to!(one_row_one_field_cr, "a\r", vec![vec!["a"]]);
parses_to!(one_row_many_fields_cr, "a,b,c\r", vec![vec!["a", "b", "c"]]);

parses_to!(many_rows_one_field, "a\nb", vec![vec!["a"], vec!["b"]]);
parses_to!(
    many_rows_many_fields,
    "a,b,c\nx,y,z",
    vec![vec!["a", "b", "c"], vec!["x", "y", "z"]]
);
parses_to!(
    many_rows_mixed_breaks,
    "a\r\nb\rc\nd",
    vec![vec!["a"], vec!["b"], vec!["c"], vec!["d"]]
);
parses_to!(
    many_rows_varying_lengths,
    "a\nx,y\n,,,",
    vec![vec!["a"], vec!["x", "y"], vec!["", "", "", ""]]
);

parses_to!(empty, "", vec![vec![""]]);
parses_to!(empty_lines, "\n\n\n", vec![vec![""], vec![""], vec![""]]);
parses_to!(
    empty_lines_crlf,
    "\r\n\r\n",
    vec![vec![""], vec![""]]
);
parses_to!(
    empty_lines_interspersed,
    "\na\n\nb\n",
    vec![vec![""], vec!["a"], vec![""], vec!["b"]]
);
parses_to!(lf_then_cr, "\n\r", vec![vec![""], vec![""]]);
parses_to!(only_separator, ",", vec![vec!["", ""]]);

parses_to!(quote_empty, "\"\"", vec![vec![""]]);
parses_to!(quote_empty_after_line, "a\n\"\"", vec![vec!["a"], vec![""]]);
parses_to!(quote_lf, "\"\n\"", vec![vec!["\n"]]);
parses_to!(quote_crlf, "\"a\r\nb\"", vec![vec!["a\r\nb"]]);
parses_to!(quote_cr, "\"a\rb\"", vec![vec!["a\rb"]]);
parses_to!(quote_space, "\" \"", vec![vec![" "]]);
parses_to!(quote_inner_space, "\" a \"", vec![vec![" a "]]);
parses_to!(quote_outer_space, "  \"a\"  ", vec![vec!["  \"a\"  "]]);
parses_to!(quote_doubled, "\"a\"\"b\"", vec![vec!["a\"b"]]);
parses_to!(quote_separator, "\"a,b\",c", vec![vec!["a,b", "c"]]);
parses_to!(quote_unterminated, "a,\"b", vec![vec!["a", "b"]]);
parses_to!(quote_in_unquoted, "a\"b\",c", vec![vec!["a\"b\"", "c"]]);
parses_to!(
    quote_multiline,
    "\"line one\nline two\",x\r\ny",
    vec![vec!["line one\nline two", "x"], vec!["y"]]
);
parses_to!(
    quote_trailing_crlf,
    "\"a\"\r\n\"b\"\r\n",
    vec![vec!["a"], vec!["b"]]
);

parses_to!(
    separator_semicolon,
    "a;b,c\nd;e",
    vec![vec!["a", "b,c"], vec!["d", "e"]],
    |rdr: &mut ReaderBuilder| {
        rdr.separator(';');
    }
);
parses_to!(
    separator_tab,
    "a\tb\n\"c\td\"\te",
    vec![vec!["a", "b"], vec!["c\td", "e"]],
    |rdr: &mut ReaderBuilder| {
        rdr.separator('\t');
    }
);
parses_to!(
    separator_unicode,
    "a→b→\"c→d\"",
    vec![vec!["a", "b", "c→d"]],
    |rdr: &mut ReaderBuilder| {
        rdr.separator('→');
    }
);
parses_to!(
    quote_single,
    "'a,b','it''s'",
    vec![vec!["a,b", "it's"]],
    |rdr: &mut ReaderBuilder| {
        rdr.quote('\'');
    }
);
parses_to!(
    quote_single_keeps_double,
    "\"a\",b",
    vec![vec!["\"a\"", "b"]],
    |rdr: &mut ReaderBuilder| {
        rdr.quote('\'');
    }
);

fail_parses_to!(fail_text_after_quote, "\"a\"b", 1);
fail_parses_to!(fail_quote_after_quote_space, "x\ny\n\"a\" ,b", 3);
fail_parses_to!(fail_after_multiline, "\"a\nb\"c", 2);

writes_as!(write_one_field, vec![vec!["a"]], "a");
writes_as!(write_many_fields, vec![vec!["a", "b", "c"]], "a,b,c");
writes_as!(
    write_many_records,
    vec![vec!["a", "b"], vec!["c"], vec!["", "d"]],
    "a,b\r\nc\r\n,d"
);
writes_as!(write_empty_field, vec![vec![""]], "\"\"");
writes_as!(
    write_empty_fields,
    vec![vec!["a"], vec![""], vec!["", ""]],
    "a\r\n\"\"\r\n,"
);
writes_as!(write_quote, vec![vec!["a\"b"]], "\"a\"\"b\"");
writes_as!(write_separator, vec![vec!["a,b", "c"]], "\"a,b\",c");
writes_as!(write_lf, vec![vec!["a\nb"]], "\"a\nb\"");
writes_as!(write_cr, vec![vec!["a\rb"]], "\"a\rb\"");
writes_as!(write_space, vec![vec![" a "]], " a ");
writes_as!(
    write_forced,
    vec![vec!["a", ""], vec![""]],
    "\"a\",\"\"\r\n\"\"",
    |wtr: &mut WriterBuilder| {
        wtr.quote_limit(-1);
    }
);
writes_as!(
    write_over_limit,
    vec![vec!["abcd", "abc"]],
    "\"abcd\",abc",
    |wtr: &mut WriterBuilder| {
        wtr.quote_limit(3);
    }
);
writes_as!(
    write_separator_semicolon,
    vec![vec!["a,b", "c;d"]],
    "a,b;\"c;d\"",
    |wtr: &mut WriterBuilder| {
        wtr.separator(';');
    }
);
writes_as!(
    write_quote_single,
    vec![vec!["it's", "say \"hi\""]],
    "'it''s',say \"hi\"",
    |wtr: &mut WriterBuilder| {
        wtr.quote('\'');
    }
);

// Reading in any mix of granularities yields the same fields in the same
// order as `read_all`.
#[test]
fn interleaved_reads_match_read_all() {
    let data = "a,b,c\n\"d\ne\",f\r\n\ng,\"h\"\"\",i\rj";
    let expected: Vec<String> = parse(&mut ReaderBuilder::new(), data)
        .into_iter()
        .flatten()
        .collect();
    for pattern in 0..27u32 {
        let mut rdr = Reader::from_text(data);
        let mut got = vec![];
        let mut p = pattern;
        loop {
            let done = match p % 3 {
                0 => match rdr.read_field().unwrap() {
                    Some(field) => {
                        got.push(field);
                        false
                    }
                    None => rdr.is_done(),
                },
                1 => match rdr.read_record().unwrap() {
                    Some(rec) => {
                        got.extend(rec.into_fields());
                        false
                    }
                    None => true,
                },
                _ => match rdr.read_all().unwrap() {
                    Some(doc) => {
                        got.extend(doc.into_iter().flatten());
                        false
                    }
                    None => true,
                },
            };
            if done {
                break;
            }
            p = p / 3 + pattern;
        }
        assert_eq!(got, expected, "pattern {}", pattern);
        assert_eq!(rdr.read_all().unwrap(), None);
    }
}

#[test]
fn write_then_read() {
    let rows = vec![
        vec!["plain", "with,comma", "with \"quote\""],
        vec![""],
        vec!["multi\r\nline", "", " padded "],
        vec![""],
    ];
    let mut wtr = Writer::from_memory();
    wtr.write_document(&rows).unwrap();
    let got = parse(&mut ReaderBuilder::new(), wtr.as_str());
    assert_eq!(got, to_strings(rows));
}

#[test]
fn read_from_io_then_write_to_io() {
    let data = "é,\"ü\nö\"\r\n😀,x";
    let mut rdr = Reader::from_reader(data.as_bytes());
    let doc = rdr.read_all().unwrap().unwrap();
    let mut wtr = Writer::from_writer(vec![]);
    wtr.write_document(&doc).unwrap();
    let out = wtr.into_inner().into_inner().unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), data);
}
