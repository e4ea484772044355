use crate::software_tests::common;
use test_case::test_case;

// Values of 2^32 and above are left out, they wrap like the board's strtoul does
#[test_case("pu -0x100 16\n", "FFFFFF00\r\n10\r\n"; "u32 minus 0x100 hex")]
#[test_case("pu -0x1 16\n", "FFFFFFFF\r\n10\r\n"; "u32 minus one hex")]
#[test_case("pu 0x0 16\n", "0\r\n3\r\n"; "u32 zero hex")]
#[test_case("pu 0x1 16\n", "1\r\n3\r\n"; "u32 one hex")]
#[test_case("pu 0x7fffffff 16\n", "7FFFFFFF\r\n10\r\n"; "u32 i32 max hex")]
#[test_case("pu 0x80000000 16\n", "80000000\r\n10\r\n"; "u32 i32 min hex")]
#[test_case("pu 0xffffffff 16\n", "FFFFFFFF\r\n10\r\n"; "u32 max hex")]
#[test_case("pu -0x100\n", "4294967040\r\n12\r\n"; "u32 minus 0x100")]
#[test_case("pu -0x1\n", "4294967295\r\n12\r\n"; "u32 minus one")]
#[test_case("pu 0x0\n", "0\r\n3\r\n"; "u32 zero")]
#[test_case("pu 0x1\n", "1\r\n3\r\n"; "u32 one")]
#[test_case("pu 0x7fffffff\n", "2147483647\r\n12\r\n"; "u32 i32 max")]
#[test_case("pu 0x80000000\n", "2147483648\r\n12\r\n"; "u32 i32 min")]
#[test_case("pu 0xffffffff\n", "4294967295\r\n12\r\n"; "u32 max")]
#[test_case("pi -256 10\n", "-256\r\n6\r\n"; "i32 minus 256")]
#[test_case("pi -1 10\n", "-1\r\n4\r\n"; "i32 minus one")]
#[test_case("pi 0 10\n", "0\r\n3\r\n"; "i32 zero")]
#[test_case("pi 1 10\n", "1\r\n3\r\n"; "i32 one")]
#[test_case("pi 2147483647 10\n", "2147483647\r\n12\r\n"; "i32 max")]
#[test_case("pi 2147483648 10\n", "-2147483648\r\n13\r\n"; "i32 min")]
#[test_case("pi 4294967295 10\n", "-1\r\n4\r\n"; "i32 u32 max")]
#[test_case("pi -0400 16\n", "FFFFFF00\r\n10\r\n"; "i32 minus 256 octal in hex")]
#[test_case("pi -01 16\n", "FFFFFFFF\r\n10\r\n"; "i32 minus one octal in hex")]
#[test_case("pi 00 16\n", "0\r\n3\r\n"; "i32 zero octal in hex")]
#[test_case("pi 01 16\n", "1\r\n3\r\n"; "i32 one octal in hex")]
#[test_case("pi 017777777777 16\n", "7FFFFFFF\r\n10\r\n"; "i32 max octal in hex")]
#[test_case("pi 020000000000 16\n", "80000000\r\n10\r\n"; "i32 min octal in hex")]
#[test_case("pi 037777777777 16\n", "FFFFFFFF\r\n10\r\n"; "i32 u32 max octal in hex")]
#[test_case("pu 255 2\n", "11111111\r\n10\r\n"; "u32 binary")]
#[test_case("pu 35 36\n", "Z\r\n3\r\n"; "u32 base 36")]
#[test_case("ps Hello\n", "Hello\r\n7\r\n"; "string")]
#[test_case("ps Unicode_☺\n", "Unicode_☺\r\n13\r\n"; "string unicode")]
fn print_answers_value_and_length(cmd: &str, expected: &str) {
    let mut device = common::device();
    let (out, err) = common::run(&mut device, cmd);

    assert_eq!(out, expected);
    assert_eq!(err, "");
}

#[test_case("pu\n"; "u32 missing value")]
#[test_case("pu foo\n"; "u32 word")]
#[test_case("pu bar 10\n"; "u32 word with base")]
#[test_case("pu 133 foos\n"; "u32 word base")]
#[test_case("pu 1 16 3\n"; "u32 extra argument")]
#[test_case("pu 123foo\n"; "u32 trailing garbage")]
#[test_case("pu 1 1\n"; "u32 base one")]
#[test_case("pu 1 37\n"; "u32 base 37")]
#[test_case("pi 08\n"; "i32 invalid octal")]
#[test_case("ps\n"; "string missing")]
#[test_case("ps    \n"; "string blank")]
#[test_case("ps foo bar   \n"; "string two words")]
fn malformed_print_is_ignored(cmd: &str) {
    let mut device = common::device();
    let (out, err) = common::run(&mut device, cmd);

    assert_eq!((out.as_str(), err.as_str()), ("", ""));
}
