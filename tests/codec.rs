use hpfold::engines::generation::codec::{
    decode_genepool, decode_individual, decode_move, encode_genepool, encode_individual,
    encode_move,
};
use hpfold::types::{Individual, Move};
use hpfold::FoldError;

#[test]
fn test_every_move_round_trips() {
    for m in Move::ALL {
        assert_eq!(decode_move(encode_move(m)).unwrap(), m);
    }
    assert_eq!(encode_move(Move::Left), 'l');
    assert_eq!(encode_move(Move::Right), 'r');
    assert_eq!(encode_move(Move::Straight), 's');
}

#[test]
fn test_foreign_characters_fail() {
    for c in ['L', 'R', 'S', 'x', '0', ' ', '\n', 'é', 'ß'] {
        match decode_move(c) {
            Err(FoldError::Decode(bad)) => assert_eq!(bad, c),
            other => panic!("'{}' decoded to {:?}", c, other),
        }
    }
}

#[test]
fn test_individual_round_trip() {
    let individual = Individual::new(vec![Move::Left, Move::Straight, Move::Right, Move::Right]);
    let wire = encode_individual(&individual);
    assert_eq!(wire, "lsrr");
    assert_eq!(decode_individual(&wire).unwrap(), individual);
    assert_eq!(individual.to_string(), wire);
}

#[test]
fn test_genepool_payload_is_fixed_width() {
    let pool = vec![
        Individual::new(vec![Move::Left; 4]),
        Individual::new(vec![Move::Right; 4]),
        Individual::new(vec![Move::Straight; 4]),
    ];
    let payload = encode_genepool(&pool);
    assert_eq!(payload.len(), 3 * 4);
    assert_eq!(decode_genepool(&payload, 4).unwrap(), pool);
}

#[test]
fn test_payload_not_multiple_of_width() {
    assert!(matches!(
        decode_genepool("lrslr", 4),
        Err(FoldError::ProtocolLength { length: 5, width: 4 })
    ));
}

#[test]
fn test_bad_character_fails_whole_payload() {
    assert!(matches!(decode_genepool("lrsxlrsl", 4), Err(FoldError::Decode('x'))));
    assert!(matches!(decode_genepool("lrsé", 2), Err(FoldError::Decode('é'))));
}
