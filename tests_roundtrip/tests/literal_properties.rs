//! Properties of encode → echo → decode

use bridge_types::{
    BridgeConfig, BridgeError, FunctionRef, IntegerRange, UnencodableValueError, Value, ValueKind,
};
use exec_channel::ExecutionChannel;
use literal_codec::{decode, encode, encode_string, parse_literal, Literal};
use remote_proxy::Bridge;
use sim_host::{EchoHost, RecordingChannel};
use tests_roundtrip::echo_round_trip;

#[test]
fn test_booleans_round_trip() {
    let config = BridgeConfig::default();
    for value in [true, false] {
        let back = echo_round_trip(&Value::Boolean(value), &ValueKind::Boolean, &config).unwrap();
        assert_eq!(back, Value::Boolean(value));
    }
}

#[test]
fn test_integers_round_trip() {
    let config = BridgeConfig::default();
    for value in [0, 1, -1, 42, i64::from(i32::MAX), i64::from(i32::MIN)] {
        let back = echo_round_trip(&Value::Integer(value), &ValueKind::Integer, &config).unwrap();
        assert_eq!(back, Value::Integer(value));
    }
}

#[test]
fn test_floats_round_trip() {
    let config = BridgeConfig::default();
    let values = [
        0.0,
        -0.0,
        0.1,
        -2.5,
        1e300,
        -1.5e-300,
        f64::MAX,
        f64::MIN_POSITIVE,
        f64::EPSILON,
        f64::INFINITY,
        f64::NEG_INFINITY,
    ];
    for value in values {
        let back = echo_round_trip(&Value::Float(value), &ValueKind::Float, &config).unwrap();
        let back = back.as_float().unwrap();
        assert_eq!(back.to_bits(), value.to_bits(), "{} came back as {}", value, back);
    }

    let nan = echo_round_trip(&Value::Float(f64::NAN), &ValueKind::Float, &config).unwrap();
    assert!(nan.as_float().unwrap().is_nan());
}

#[test]
fn test_strings_round_trip() {
    let config = BridgeConfig::default();
    let values = [
        "",
        "plain",
        "it's \"quoted\"",
        "back\\slash\\",
        "\\n is not a newline",
        "line\nbreak\r\ttab",
        "\u{0}\u{7}\u{8}\u{b}\u{c}\u{1b}\u{7f}\u{85}",
        "héllo ✓ 𝄞 \u{2028}\u{2029}",
        "'''triple'''",
    ];
    for value in values {
        let back = echo_round_trip(&Value::from(value), &ValueKind::String, &config).unwrap();
        assert_eq!(back, Value::from(value));
    }
}

#[test]
fn test_containers_round_trip() {
    let config = BridgeConfig::default();
    let list = Value::Array(vec![Value::from(1), Value::from(2), Value::from(3)]);
    assert_eq!(
        echo_round_trip(&list, &ValueKind::array_of(ValueKind::Integer), &config).unwrap(),
        list
    );

    let tuple = Value::Tuple(vec![Value::from("x"), Value::Float(0.5)]);
    let kind = ValueKind::Tuple(vec![ValueKind::String, ValueKind::Float]);
    assert_eq!(echo_round_trip(&tuple, &kind, &config).unwrap(), tuple);

    let mut map = std::collections::BTreeMap::new();
    map.insert("a".to_string(), Value::from(true));
    map.insert("b\"".to_string(), Value::from(false));
    let dict = Value::Dict(map);
    assert_eq!(
        echo_round_trip(&dict, &ValueKind::dict_of(ValueKind::Boolean), &config).unwrap(),
        dict
    );
}

#[test]
fn test_injection_payload_stays_a_string() {
    let payload = "a\"); os.exit() #";
    let literal = encode_string(payload);
    assert_eq!(
        parse_literal(&literal, 64).unwrap(),
        Literal::Str(payload.to_string())
    );

    // Embedded in a larger expression, the literal is still exactly one item.
    let surrounding = format!("[{}, 1]", literal);
    assert_eq!(
        parse_literal(&surrounding, 64).unwrap(),
        Literal::List(vec![Literal::Str(payload.to_string()), Literal::Int(1)])
    );

    for payload in ["'); import os #", "\\\"; x = 1", "\n]", "\u{2028}evil"] {
        let literal = encode_string(payload);
        assert!(!literal.contains('\n'));
        assert_eq!(
            parse_literal(&literal, 64).unwrap(),
            Literal::Str(payload.to_string())
        );
    }
}

#[test]
fn test_enum_set_order_independence() {
    let config = BridgeConfig::default();
    let kind = ValueKind::EnumSet;
    let ba = echo_round_trip(&Value::enum_set(["B", "A"]), &kind, &config).unwrap();
    let ab = echo_round_trip(&Value::enum_set(["A", "B"]), &kind, &config).unwrap();
    assert_eq!(ba, ab);

    // Host output order does not matter either.
    let from_host_ba = decode("{'B', 'A'}", &kind, &config).unwrap();
    let from_host_ab = decode("{'A', 'B'}", &kind, &config).unwrap();
    assert_eq!(from_host_ba, from_host_ab);
    assert_eq!(from_host_ab, ab);
}

#[test]
fn test_function_rejected_before_any_call() {
    let mut bridge = Bridge::new(RecordingChannel::new(EchoHost::new()));
    let callback = Value::Function(FunctionRef::new("on_update"));

    let err = bridge.object("scene").set("handler", callback).unwrap_err();
    assert!(matches!(
        err,
        BridgeError::Unencodable(UnencodableValueError::Function { .. })
    ));
    assert_eq!(bridge.channel().call_count(), 0);
}

#[test]
fn test_decode_failure_isolation() {
    let config = BridgeConfig::default();
    let err = decode("Tru", &ValueKind::Boolean, &config).unwrap_err();
    assert_eq!(err.text, "Tru");
    assert_eq!(err.expected, ValueKind::Boolean);

    let bridged: BridgeError = err.into();
    assert!(bridged.is_partial());
}

#[test]
fn test_integer_boundary_int32() {
    let config = BridgeConfig::default();
    let max = Value::Integer(i64::from(i32::MAX));
    assert_eq!(
        echo_round_trip(&max, &ValueKind::Integer, &config).unwrap(),
        max
    );

    let past = Value::Integer(i64::from(i32::MAX) + 1);
    let err = echo_round_trip(&past, &ValueKind::Integer, &config).unwrap_err();
    assert!(matches!(
        err,
        BridgeError::Unencodable(UnencodableValueError::IntegerOutOfRange { .. })
    ));

    let below = Value::Integer(i64::from(i32::MIN) - 1);
    assert!(encode(&below, &config).is_err());

    // A host answer past the range is a decode error, never a wrapped value.
    assert!(decode("2147483648", &ValueKind::Integer, &config).is_err());
}

#[test]
fn test_integer_boundary_int64() {
    let config = BridgeConfig::default().with_integer_range(IntegerRange::Int64);
    for value in [i64::MAX, i64::MIN] {
        let back = echo_round_trip(&Value::Integer(value), &ValueKind::Integer, &config).unwrap();
        assert_eq!(back, Value::Integer(value));
    }
    assert!(decode("9223372036854775808", &ValueKind::Integer, &config).is_err());
}

#[test]
fn test_undefined_echoes_as_null() {
    let config = BridgeConfig::default();
    let back = echo_round_trip(&Value::Undefined, &ValueKind::Null, &config).unwrap();
    assert_eq!(back, Value::Null);
}

#[test]
fn test_depth_limit_both_ways() {
    let config = BridgeConfig::default().with_max_depth(3);
    let mut nested = Value::from(1);
    for _ in 0..4 {
        nested = Value::Array(vec![nested]);
    }
    assert!(matches!(
        encode(&nested, &config),
        Err(UnencodableValueError::TooDeep(3))
    ));

    let mut host = EchoHost::new();
    let response = host.execute("[[[[1]]]]").unwrap();
    assert!(decode(&response, &ValueKind::Any, &config).is_err());
}
