use std::f64::consts::{FRAC_PI_4, PI};

use mawa::calc::{
    evaluate, CalcError, Calculator, EvalError, LimitError, Limits, Number,
    BINARY_FUNCTION_DATA, CONSTANT_DATA, UNARY_FUNCTION_DATA
};
use num_bigint::BigInt;

fn float(expr: &str) -> f64 {
    match evaluate(expr).expect("failed to evaluate") {
        Number::Float(float) => float,
        Number::Int(int) => panic!("{expr} gave the integer {int}")
    }
}

fn int(expr: &str) -> BigInt {
    match evaluate(expr).expect("failed to evaluate") {
        Number::Int(int) => int,
        Number::Float(float) => panic!("{expr} gave the float {float}")
    }
}

#[test]
fn integers_come_back_unchanged() {
    assert_eq!(int("0"), BigInt::from(0));
    assert_eq!(int("42"), BigInt::from(42));
    let huge = "123456789012345678901234567890";
    assert_eq!(int(huge).to_string(), huge);
    assert_eq!(evaluate("  7 ").unwrap().to_string(), "7");
}

#[test]
fn precedence_and_associativity() {
    assert_eq!(int("1 + 2 * 3"), BigInt::from(7));
    assert_eq!(int("10 - 4 - 3"), BigInt::from(3));
    assert_eq!(int("2 ** 3 ** 2"), BigInt::from(512));
    assert_eq!(int("-2 ** 2"), BigInt::from(-4));
    assert_eq!(int("(-2) ** 2"), BigInt::from(4));
    assert_eq!(int("2 * -3"), BigInt::from(-6));
    assert_eq!(int("--3"), BigInt::from(3));
    assert_eq!(int("1 - -1"), BigInt::from(2));
    assert_eq!(float("2 ** -1"), 0.5);
    assert_eq!(int("7 // 2 * 2"), BigInt::from(6));

    let tree = Calculator::default().parse("1 + 2 * 3 ** 2").unwrap();
    assert_eq!(tree.to_string(), "(1 + (2 * (3 ** 2)))");
}

#[test]
fn caret_is_exponentiation() {
    assert_eq!(int("2 ** 10"), BigInt::from(1024));
    assert_eq!(int("2 ^ 10"), BigInt::from(1024));
    assert_eq!(evaluate("2^10").unwrap(), evaluate("2**10").unwrap());
}

#[test]
fn every_bracket_kind_groups() {
    for expr in ["(1 + 2) * 3", "[1 + 2] * 3", "{1 + 2} * 3"] {
        assert_eq!(int(expr), BigInt::from(9), "{expr}");
    }
    assert_eq!(float("sqrt[16]"), 4.0);
    assert_eq!(float("sqrt{16}"), 4.0);
    assert!(matches!(evaluate("(1 + 2]"), Err(CalcError::Syntax { .. })));
}

#[test]
fn division() {
    assert_eq!(float("1 / 2"), 0.5);
    assert_eq!(float("4 / 2"), 2.0);
    assert_eq!(int("7 // 2"), BigInt::from(3));
    assert_eq!(int("-7 // 2"), BigInt::from(-4));
    assert_eq!(float("-7.0 // 2"), -4.0);
    assert_eq!(float("7.5 // -2"), -4.0);
    // Integer operands only need their quotient to fit in a float
    assert_eq!(float("2 ** 2000 / 2 ** 1999"), 2.0);
    assert_eq!(float("1 / 10 ** 400"), 0.0);
    assert_eq!(float("-(10 ** 400) / 10 ** 399"), -10.0);
    assert_eq!(evaluate("10 ** 400 / 3"), Err(CalcError::Evaluation(EvalError::Overflow)));
    assert_eq!(evaluate("1 / 0"), Err(CalcError::Evaluation(EvalError::DivisionByZero)));
    assert_eq!(evaluate("1 // 0"), Err(CalcError::Evaluation(EvalError::DivisionByZero)));
    assert_eq!(evaluate("1.0 / 0.0"), Err(CalcError::Evaluation(EvalError::DivisionByZero)));
    assert_eq!(evaluate("0 ** -1"), Err(CalcError::Evaluation(EvalError::DivisionByZero)));
}

#[test]
fn mixed_operands_promote() {
    assert_eq!(float("1 + 0.5"), 1.5);
    assert_eq!(float("2 * 1.5"), 3.0);
    assert!((float("2 ** 0.5") - 2f64.sqrt()).abs() < 1e-15);
    assert_eq!(float("1e3"), 1000.0);
    assert_eq!(float(".5 + 1."), 1.5);
    assert_eq!(evaluate("(-8) ** 0.5"), Err(CalcError::Evaluation(EvalError::Domain("pow"))));
    assert_eq!(evaluate("10 ** 400 * 1.0"), Err(CalcError::Evaluation(EvalError::Overflow)));
}

#[test]
fn functions_and_constants() {
    assert_eq!(float("sqrt(16)"), 4.0);
    assert!((float("atan2(1, 1)") - FRAC_PI_4).abs() < 1e-12);
    assert_eq!(float("pi"), PI);
    assert_eq!(float("2 * pi"), float("tau"));
    assert_eq!(float("log(e)"), 1.0);
    assert_eq!(float("ln(1)"), 0.0);
    assert_eq!(float("logb(8, 2)"), 3.0);
    assert!((float("log(10 ** 400)") - 921.034_037_197_618_3).abs() < 1e-9);
    assert!((float("logb(2 ** 3000, 2)") - 3000.0).abs() < 1e-9);
    assert_eq!(float("hypot(3, 4)"), 5.0);
    assert_eq!(int("factorial(5)"), BigInt::from(120));
    assert_eq!(int("floor(-0.5)"), BigInt::from(-1));
    assert_eq!(int("ceil(0.5)"), BigInt::from(1));
    assert_eq!(int("abs(-3)"), BigInt::from(3));
    assert_eq!(float("abs(-3.0)"), 3.0);
    assert_eq!(int("gcd(12, 18)"), BigInt::from(6));
    assert_eq!(float("degrees(pi)"), 180.0);
    assert!(float("nan").is_nan());
    assert_eq!(float("-inf"), f64::NEG_INFINITY);
}

#[test]
fn function_faults() {
    let eval = |expr| evaluate(expr).map_err(|err| match err {
        CalcError::Evaluation(err) => err,
        other => panic!("{expr} failed to parse: {other}")
    });
    assert_eq!(eval("sqrt(-1)"), Err(EvalError::Domain("sqrt")));
    assert_eq!(eval("log(0)"), Err(EvalError::Domain("log")));
    assert_eq!(eval("exp(1000)"), Err(EvalError::Overflow));
    assert_eq!(eval("factorial(-1)"), Err(EvalError::Domain("factorial")));
    assert_eq!(eval("factorial(2.5)"), Err(EvalError::Domain("factorial")));
    assert_eq!(eval("gcd(1.5, 3)"), Err(EvalError::NotInteger("gcd")));
    assert_eq!(eval("floor(inf)"), Err(EvalError::Overflow));
    assert_eq!(eval("floor(nan)"), Err(EvalError::Domain("floor")));
}

#[test]
fn names_are_allow_listed() {
    assert_eq!(evaluate("bogus(1)"), Err(CalcError::Syntax {
        column: 1,
        reason: String::from("unknown name `bogus`")
    }));
    assert_eq!(evaluate("1 + x"), Err(CalcError::Syntax {
        column: 5,
        reason: String::from("unknown name `x`")
    }));
    assert!(evaluate("eval(1)").unwrap_err().is_parse_error());
    assert!(matches!(evaluate("sqrt"), Err(CalcError::Syntax { .. })));
    assert!(matches!(evaluate("pi(2)"), Err(CalcError::Syntax { .. })));
    assert!(matches!(evaluate("atan2(1)"), Err(CalcError::Syntax { .. })));
    assert!(matches!(evaluate("sqrt(1, 2)"), Err(CalcError::Syntax { .. })));

    // Every listed spelling resolves
    for data in &CONSTANT_DATA {
        for alias in data.aliases {
            evaluate(alias).expect("constant should evaluate");
        }
    }
    for data in &UNARY_FUNCTION_DATA {
        for alias in data.aliases {
            let result = evaluate(&format!("{alias}(1)"));
            assert!(!matches!(result, Err(ref err) if err.is_parse_error()), "{alias}: {result:?}");
        }
    }
    for data in &BINARY_FUNCTION_DATA {
        for alias in data.aliases {
            let result = evaluate(&format!("{alias}(4, 2)"));
            assert!(!matches!(result, Err(ref err) if err.is_parse_error()), "{alias}: {result:?}");
        }
    }
}

#[test]
fn malformed_input() {
    assert!(matches!(evaluate("(1+2"), Err(CalcError::Syntax { .. })));
    assert!(matches!(evaluate("1 +"), Err(CalcError::Syntax { .. })));
    assert!(matches!(evaluate(""), Err(CalcError::Syntax { column: 1, .. })));
    assert!(matches!(evaluate("1 2"), Err(CalcError::Syntax { column: 3, .. })));
    assert_eq!(evaluate("2 & 3"), Err(CalcError::Lexical { character: '&', column: 3 }));
    assert_eq!(evaluate("__import__"), Err(CalcError::Lexical { character: '_', column: 1 }));
    assert_eq!(
        evaluate("2 & 3").unwrap_err().to_string(),
        "illegal character '&' at column 3"
    );
}

#[test]
fn limits_are_enforced() {
    let calculator = Calculator::new(Limits { max_depth: 3, max_tokens: 10, max_int_bits: 64 });
    assert!(calculator.evaluate("((1))").is_ok());
    assert_eq!(
        calculator.evaluate("((((1))))"),
        Err(CalcError::Limit(LimitError::Depth(3)))
    );
    assert_eq!(
        calculator.evaluate("1+1+1+1+1+1"),
        Err(CalcError::Limit(LimitError::Tokens(10)))
    );
    assert_eq!(
        calculator.evaluate("2 ** 100"),
        Err(CalcError::Evaluation(EvalError::TooLarge(64)))
    );
    assert!(calculator.evaluate("2 ** 60").is_ok());
    assert_eq!(
        calculator.evaluate("factorial(100)"),
        Err(CalcError::Evaluation(EvalError::TooLarge(64)))
    );

    // The defaults stop the classic memory bombs
    assert!(matches!(evaluate("9 ** 9 ** 9"), Err(CalcError::Evaluation(EvalError::TooLarge(_)))));
    assert!(matches!(evaluate(&"(".repeat(500)), Err(CalcError::Limit(_))));
    // Trivial bases don't grow no matter the exponent
    assert_eq!(int("1 ** 99999999999999999999"), BigInt::from(1));
    assert_eq!(int("(-1) ** 99999999999999999999"), BigInt::from(-1));
}

#[test]
fn formatting() {
    assert_eq!(evaluate("1 / 3").unwrap().format(4), "0.3333");
    assert_eq!(evaluate("1 / 3").unwrap().format(2), "0.33");
    assert_eq!(evaluate("2 ** 64").unwrap().format(4), "18446744073709551616");
    assert_eq!(evaluate("sqrt(16)").unwrap().to_string(), "4.0000");
    assert_eq!(evaluate("inf").unwrap().to_string(), "inf");
    assert_eq!(evaluate("-inf").unwrap().to_string(), "-inf");
    assert_eq!(evaluate("nan").unwrap().to_string(), "nan");
}

#[test]
fn calculators_are_shared_across_threads() {
    fn assert_sync<T: Send + Sync>() {}
    assert_sync::<Calculator>();

    let calculator = Calculator::default();
    std::thread::scope(|scope| {
        let handles = (0..4)
            .map(|n| {
                let calculator = &calculator;
                scope.spawn(move || calculator.evaluate(&format!("{n} * 10")))
            })
            .collect::<Vec<_>>();
        for (n, handle) in handles.into_iter().enumerate() {
            assert_eq!(handle.join().unwrap(), Ok(Number::from(n as i64 * 10)));
        }
    });
}
