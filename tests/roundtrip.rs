use csv_fsm::{Reader, ReaderBuilder, Record, Writer, WriterBuilder};
use quickcheck::{quickcheck, TestResult};

const SEPARATORS: &[char] = &[',', ';', '\t', '|', ' ', '→'];
const QUOTES: &[char] = &['"', '\'', '«', '$'];

type Rows = Vec<Vec<String>>;

fn is_writable(rows: &Rows) -> bool {
    !rows.is_empty() && rows.iter().all(|row| !row.is_empty())
}

fn write(wtr: &mut WriterBuilder, rows: &Rows) -> String {
    let mut wtr = wtr.from_memory();
    wtr.write_document(rows).unwrap();
    wtr.into_inner()
}

fn read(rdr: &mut ReaderBuilder, data: &str) -> Rows {
    let mut rdr = rdr.from_text(data);
    rdr.read_all()
        .unwrap()
        .unwrap_or_default()
        .into_iter()
        .map(Record::into_fields)
        .collect()
}

#[test]
fn same_records() {
    fn prop(rows: Rows) -> TestResult {
        if !is_writable(&rows) {
            return TestResult::discard();
        }
        let data = write(&mut WriterBuilder::new(), &rows);
        let got = read(&mut ReaderBuilder::new(), &data);
        TestResult::from_bool(got == rows)
    }
    quickcheck(prop as fn(Rows) -> TestResult);
}

#[test]
fn same_records_forced_quotes() {
    fn prop(rows: Rows) -> TestResult {
        if !is_writable(&rows) {
            return TestResult::discard();
        }
        let data = write(WriterBuilder::new().quote_limit(-1), &rows);
        let got = read(&mut ReaderBuilder::new(), &data);
        TestResult::from_bool(got == rows)
    }
    quickcheck(prop as fn(Rows) -> TestResult);
}

#[test]
fn same_records_any_dialect() {
    fn prop(rows: Rows, sep: usize, quote: usize) -> TestResult {
        if !is_writable(&rows) {
            return TestResult::discard();
        }
        let sep = SEPARATORS[sep % SEPARATORS.len()];
        let quote = QUOTES[quote % QUOTES.len()];
        let data =
            write(WriterBuilder::new().separator(sep).quote(quote), &rows);
        let got =
            read(ReaderBuilder::new().separator(sep).quote(quote), &data);
        TestResult::from_bool(got == rows)
    }
    quickcheck(prop as fn(Rows, usize, usize) -> TestResult);
}

#[test]
fn same_records_short_quote_limit() {
    fn prop(rows: Rows, limit: u8) -> TestResult {
        if !is_writable(&rows) {
            return TestResult::discard();
        }
        let data = write(WriterBuilder::new().quote_limit(limit as i64), &rows);
        let got = read(&mut ReaderBuilder::new(), &data);
        TestResult::from_bool(got == rows)
    }
    quickcheck(prop as fn(Rows, u8) -> TestResult);
}

#[test]
fn same_records_through_io() {
    fn prop(rows: Rows) -> TestResult {
        if !is_writable(&rows) {
            return TestResult::discard();
        }
        let mut wtr = Writer::from_writer(vec![]);
        wtr.write_document(&rows).unwrap();
        let bytes = wtr.into_inner().into_inner().unwrap();
        let mut rdr = Reader::from_reader(&*bytes);
        let got: Rows = rdr
            .records()
            .map(|rec| rec.unwrap().into_fields())
            .collect();
        TestResult::from_bool(got == rows)
    }
    quickcheck(prop as fn(Rows) -> TestResult);
}

// Whatever mix of field, record and document reads is used, every field is
// handed out exactly once and in order.
#[test]
fn interleaved_reads() {
    fn prop(rows: Rows, choices: Vec<u8>) -> TestResult {
        if !is_writable(&rows) {
            return TestResult::discard();
        }
        let data = write(&mut WriterBuilder::new(), &rows);
        let expected: Vec<String> = rows.into_iter().flatten().collect();

        let mut rdr = Reader::from_text(&data);
        let mut got = vec![];
        let mut choices = choices.into_iter().cycle();
        loop {
            // Mostly small reads, so read_all does not end every run early.
            match choices.next().unwrap_or(0) % 8 {
                0..=4 => match rdr.read_field().unwrap() {
                    Some(field) => got.push(field),
                    None if rdr.is_done() => break,
                    None => {}
                },
                5 | 6 => match rdr.read_record().unwrap() {
                    Some(rec) => got.extend(rec.into_fields()),
                    None => break,
                },
                _ => match rdr.read_all().unwrap() {
                    Some(doc) => got.extend(doc.into_iter().flatten()),
                    None => break,
                },
            }
        }
        TestResult::from_bool(got == expected)
    }
    quickcheck(prop as fn(Rows, Vec<u8>) -> TestResult);
}

#[test]
fn blank_lines_are_records() {
    fn prop(n: u8) -> bool {
        let n = n as usize % 50 + 1;
        let data = "\n".repeat(n);
        let got = read(&mut ReaderBuilder::new(), &data);
        got == vec![vec![String::new()]; n]
    }
    quickcheck(prop as fn(u8) -> bool);
}
