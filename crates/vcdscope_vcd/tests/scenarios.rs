//! End-to-end decoding scenarios against the public API.

use vcdscope_common::{BitValue, TimeUnit};
use vcdscope_vcd::{parse, parse_with, ParseOptions, Sample, TimePolicy, Value, VcdError};

const COUNTER: &str = "\
$date
   Tue Mar 5 10:00:00 2024
$end
$version Example Simulator 2.1 $end
$comment generated for tests $end
$timescale 10 ns $end
$scope module top $end
$var reg 1 ! clk $end
$var wire 4 \" count [3:0] $end
$var real 64 # temp $end
$scope begin core $end
$var wire 1 $ en $end
$var reg 8 % state $end
$upscope $end
$upscope $end
$enddefinitions $end
#0
$dumpvars
0!
b0000 \"
r20.5 #
x$
bxxxx1111 %
$end
#5
1!
b1 \"
#10
0!
b10 \"
1$
b00000011 %
#15
1!
b11 \"
r21 #
#20
0!
bz01x \"
";

fn bits(value: u64, width: u32) -> Value {
    Value::Bits(BitValue::from_u64(value, width))
}

fn value_at(store: &vcdscope_vcd::WaveformStore, key: &str, time: u64) -> Option<Value> {
    let signal = store.find_by_key(key).unwrap();
    store
        .value_at_or_before(&signal.id, time)
        .unwrap()
        .value()
        .cloned()
}

#[test]
fn single_clock_scenario() {
    let text = "$scope module top $end\n$var reg 1 ! clk $end\n$upscope $end\n\
                $enddefinitions $end\n#0\n0!\n#10\n1!\n";
    let parsed = parse(text).unwrap();
    assert_eq!(value_at(&parsed.store, "top:clk", 5), Some(bits(0, 1)));
    assert_eq!(value_at(&parsed.store, "top:clk", 15), Some(bits(1, 1)));
}

#[test]
fn counter_header_and_signals() {
    let parsed = parse(COUNTER).unwrap();
    let store = &parsed.store;
    let meta = store.metadata();
    assert_eq!(meta.date.as_deref(), Some("Tue Mar 5 10:00:00 2024"));
    assert_eq!(meta.version.as_deref(), Some("Example Simulator 2.1"));
    let timescale = meta.timescale.unwrap();
    assert_eq!((timescale.magnitude, timescale.unit), (10, TimeUnit::Ns));

    let keys: Vec<String> = store.list_signals().iter().map(|e| e.key()).collect();
    assert_eq!(
        keys,
        vec![
            "top:clk",
            "top:count[3:0]",
            "top:temp",
            "top:core:en",
            "top:core:state"
        ]
    );
    assert_eq!(store.scopes().len(), 2);
    assert_eq!(store.max_time(), 20);
    assert!(parsed.report.is_clean());
}

#[test]
fn counter_values() {
    let parsed = parse(COUNTER).unwrap();
    let store = &parsed.store;
    assert_eq!(value_at(store, "top:count[3:0]", 12), Some(bits(2, 4)));
    assert_eq!(value_at(store, "top:temp", 14), Some(Value::Real(20.5)));
    assert_eq!(value_at(store, "top:temp", 15), Some(Value::Real(21.0)));
    assert_eq!(value_at(store, "top:core:en", 3), Some(Value::SingleUnknown));
    assert_eq!(value_at(store, "top:core:en", 10), Some(bits(1, 1)));
    assert_eq!(
        value_at(store, "top:core:state", 0),
        Some(Value::SymbolicBits {
            width: 8,
            pattern: "xxxx1111".into()
        })
    );
    assert_eq!(value_at(store, "top:core:state", 99), Some(bits(3, 8)));
    assert_eq!(
        value_at(store, "top:count[3:0]", 20),
        Some(Value::SymbolicBits {
            width: 4,
            pattern: "z01x".into()
        })
    );
}

#[test]
fn parsing_is_idempotent() {
    let first = parse(COUNTER).unwrap();
    let second = parse(COUNTER).unwrap();
    assert_eq!(first.store, second.store);
}

#[test]
fn value_at_max_time_is_last_change() {
    let parsed = parse(COUNTER).unwrap();
    let store = &parsed.store;
    for history in store.histories() {
        let Some(last) = history.last() else { continue };
        let sample = store
            .value_at_or_before(&history.signal().id, store.max_time())
            .unwrap();
        assert_eq!(sample.value(), Some(&last.value));
    }
}

#[test]
fn before_first_change_is_no_data() {
    let text = "$var wire 1 ! a $end\n$enddefinitions $end\n#7\n1!\n";
    let parsed = parse(text).unwrap();
    for t in 0..7 {
        assert_eq!(
            parsed.store.value_at_or_before("!", t).unwrap(),
            Sample::NoData
        );
    }
}

#[test]
fn wide_symbolic_is_always_symbolic() {
    for literal in ["x0", "0z", "xx", "Z1", "1X"] {
        let text = format!("$var wire 2 ! a $end\n$enddefinitions $end\n#0\nb{literal} !\n");
        let parsed = parse(&text).unwrap();
        let sample = parsed.store.value_at_or_before("!", 0).unwrap();
        assert!(
            matches!(sample.value(), Some(Value::SymbolicBits { width: 2, .. })),
            "{literal} decoded as {sample:?}"
        );
    }
}

#[test]
fn dollar_identifiers_resolve() {
    let text = "$scope module top $end\n$var wire 8 $ data $end\n$var real 64 $r temp $end\n\
                $var wire 1 $$ en $end\n$upscope $end\n$enddefinitions $end\n\
                #0\nb101 $\nr1.5 $r\n1 $$\n#4\nb0 $\n";
    let parsed = parse(text).unwrap();
    assert!(parsed.report.is_clean());
    assert_eq!(value_at(&parsed.store, "top:data", 0), Some(bits(5, 8)));
    assert_eq!(value_at(&parsed.store, "top:data", 4), Some(bits(0, 8)));
    assert_eq!(value_at(&parsed.store, "top:temp", 9), Some(Value::Real(1.5)));
    assert_eq!(value_at(&parsed.store, "top:en", 0), Some(bits(1, 1)));
}

#[test]
fn string_value_scenario() {
    let text = "$var wire 8 ! msg $end\n$enddefinitions $end\n#0\nsHELLO!\n";
    let parsed = parse(text).unwrap();
    assert_eq!(
        parsed.store.value_at_or_before("!", 0).unwrap().value(),
        Some(&Value::Text("HELLO".into()))
    );
}

#[test]
fn unknown_var_type_leaves_previous_store_untouched() {
    let previous = parse(COUNTER).unwrap();
    let snapshot = previous.store.clone();
    let err = parse("$var wirex 1 ! a $end\n$enddefinitions $end\n").unwrap_err();
    assert!(matches!(err, VcdError::Grammar { .. }));
    assert_eq!(previous.store, snapshot);
}

#[test]
fn unbalanced_upscope_is_structural() {
    let err = parse("$upscope $end\n$enddefinitions $end\n").unwrap_err();
    assert!(matches!(err, VcdError::Structural { .. }));
}

#[test]
fn wide_bus_is_exact() {
    let literal = format!("1{}1", "0".repeat(126));
    let text = format!("$var wire 128 ! wide $end\n$enddefinitions $end\n#0\nb{literal} !\n");
    let parsed = parse(&text).unwrap();
    let value = parsed.store.value_at_or_before("!", 0).unwrap().value().cloned();
    let Some(Value::Bits(bits)) = value else {
        panic!("expected a resolved value");
    };
    assert!(bits.bit(127));
    assert!(bits.bit(0));
    assert!(!bits.bit(64));
    assert_eq!(bits.to_u64(), None);
}

#[test]
fn lenient_policy_keeps_histories_sorted() {
    let text = "$var wire 1 ! a $end\n$enddefinitions $end\n#10\n1!\n#4\n0!\n#12\n1!\n";
    assert!(parse(text).is_err());
    let options = ParseOptions {
        time_policy: TimePolicy::Lenient,
    };
    let parsed = parse_with(text, &options).unwrap();
    let times: Vec<u64> = parsed
        .store
        .history("!")
        .unwrap()
        .changes()
        .iter()
        .map(|c| c.time)
        .collect();
    assert_eq!(times, vec![4, 10, 12]);
    assert_eq!(parsed.report.diagnostics.len(), 1);
}

#[test]
fn window_over_counter() {
    let parsed = parse(COUNTER).unwrap();
    let store = &parsed.store;
    let window = store.window(["!", "\""], 0, 20, 5).unwrap();
    let clk: Vec<Option<bool>> = window
        .traces()
        .next()
        .unwrap()
        .map(|(_, s)| s.value().and_then(Value::as_bool))
        .collect();
    assert_eq!(clk, vec![Some(false), Some(true), Some(false), Some(true)]);
}
