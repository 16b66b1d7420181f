use std::{fs, path::Path};

use super::*;

macro_rules! testlist {
    ($($name:ident,)*) => {
    $(
        #[test]
        fn $name() {
            run_test(stringify!($name))
        }
    )*
    }
}

testlist! {
    drawing_in_header,
    header_alignment_drawing,
    macro_cell,
    missing_required_parameter,
    row_outside_sheet,
    sheet_properties,
    simple_workbook,
    text_after_workbook,
    text_before_workbook,
    too_many_parameters,
    unclosed_sheet,
    unknown_tag,
    whitespace_control,
}

fn run_test(name: &str) {
    let rootdir = Path::new(env!("CARGO_MANIFEST_DIR"));
    let test_data_dir = rootdir.join("src/compile/tests/testdata");

    let test_file = test_data_dir.join(format!("tests/{}.txt", name));
    let expected_file = test_data_dir.join(format!("expected/{}.txt", name));
    let actual_dir = test_data_dir.join("actual");
    let actual_file = actual_dir.join(format!("{}.txt", name));

    let test = fs::read_to_string(&test_file).unwrap();

    let parser = Parser::new();
    let filename = format!("{}.txt", name);
    let result = compile_template_str(&parser, &filename, &test);
    let actual = format_result(result);

    fs::create_dir_all(actual_dir).unwrap();
    fs::write(actual_file, &actual).unwrap();

    let expected = fs::read_to_string(expected_file).unwrap();
    assert_eq!(expected, actual);
}

fn format_result(result: Result<String, SyntaxError>) -> String {
    let mut string = String::new();

    string.push_str("ERROR: ");
    if let Err(err) = result {
        string.push_str(&err.to_string());
        return string;
    }

    let output = result.unwrap();

    string.push_str("<None>\n");
    string.push_str("OUTPUT:\n");
    string.push_str(&output);

    string
}
