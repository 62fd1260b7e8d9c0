//! Shared fixtures for integration tests
//!
//! Both payloads are v2 barcodes captured from real cards and published with
//! earlier decoding tools.

#![allow(dead_code)]

/// v2 payload whose initials end on the field terminator, so a PrDP code follows
pub const SAMPLE_WITH_PRDP_HEX: &str = concat!(
    "019B094500000AC88323FD762A06B51995E3DA1B7109E03953A67DF4752390B91EB7ABC77B4DE286428B4CC1EF09045D",
    "6BCCDDC71D6D5A19F60F29D7AF28608B7D404CE51CCFE596DF94C01DE1EE84C293226D789612D679D0D03A6EE411A9ED",
    "78871EE1BAE85CA9149CF934E4CBB6E1DDB935C233AE7A64EB41F2B685E1EA906364A4C21F9238FA21F6A30BB8FA8579",
    "22AA4D0A371F30A61CF4141A50F840DD783CC31B93DE05879D6B65623828ACF7B9D4A2A663EDD60CA8F0FA294CE30301",
    "C69147197E6A09DD61CDE4647A23D66331A4C6C2D03505BEBDC83ABCF1A160161B99B5B349943B4860603364FEEC6E3D",
    "5B8FFD7199F3BA4BFC1F57056D609EC08F6B5A817C4902E79BE993A04861CA9F362DC02F61C09F584A7D3390FAA93A89",
    "C23D0A3CB0B99855FB5629CAF1456B699BB8BA6A7EB004140F14E4F353BD12BFED3C7F78F32605EFCBE15109E5A254CD",
    "635BCE66C5DB4CED5A2B5CAF9B76FE62B851221079A1DD87F702681DC995660A5683BFA0D9D7DDD9676B73D0FD39E774",
    "D93251CA485424CEBF871EB77B7706BEC31886270565B0A0394AEBB528AF2B31194E16AE11A90A5B5F881F9A9E359D8B",
    "088A78CE802CA1723B75F8DCF02195FDE7E9D82AC7041D61B234742A674F7BFF5715749DD4C755B25E22E883FCBB141D",
    "000803FA2FE952EF23E70E49B245EA84C42AF3D4B650E7F0FCBC5E8FEDD16D1D4975387A9D4C38E2682CA895DDAF5FAA",
    "98B6903C9C2DDD673950F252D7EB05D96C3A241D7767C02132EEDA78E619ED860955D8A851900CBF5757CE6AF1FE13FD",
    "575AE41CCE549599775667C5AABB1DA264B6F4672871526B6A50237B7EF9DBC9FADD4D815211FCAAA9287B3990166F4C",
    "3C9FD594080B8C53F293C34B6BB46FF58EBF12600EB9772450C44C6087F673D33DE019798A4C6386D8FC31C24AE77A32",
    "C448FAD03BA5382022992771C83CD545F186CB2697338709464E85C7C56F98EA3D21425E09F14C6185E1C54A4BD17A0F",
);

/// v2 payload without a PrDP code
pub const SAMPLE_WITHOUT_PRDP_HEX: &str = concat!(
    "019B09450000890D8C831F9C3091B148DDFD71224F9160990ABB5C7013CD6BFFCC2EC8E0740EAA750DEC95381C1BE802",
    "75EA4A94BAB58D2F81956426CD878BCFCF1487B3B69290FCAC3A769E90B29528FD98E78724C84FB5B71E6DF1E9665698",
    "3C4CAE1DE6AC2B9DDE784DE8E7C874DB5765F6EA0632D8B83C3A355850A01E38B5A053B13C2B9F54D4AB22B4BFE96C5D",
    "217EFC8D7816EE64CAB86121141D085B0BE7B68487FA7DC0A158869CCFB4B27CD13A72D18134AEDDC329281C59539BD2",
    "4421530C662179BBAD140488DC56407A54DD4C5BB1EC400B4E61956FFDD0DA65D5BFF197009A2AC036EC880655555BB9",
    "63647770F98A557DC6B514E6920923DF48D8734574699E093D89FA4E05F999488B8355AEB9CF6D062F4218458433FDD1",
    "444DCD156602E1ECD08D33C1653AFB678922B080696BBB9E277F2123DEACF1D51F2CE1A6314AB9610FEA2A92B9273F64",
    "58E5FCE32E255981E11CB8C5DCC3B8072C9540EDC9BD3162E5B4A4B44644DC91FA81971FA1D06FE4A2230E190AAF966B",
    "0A89B89E21D22B9CA23A39C19155703DE1926AE26142118BE62F10428C3FACC73CD1288C7AC7467D1C1C8860470B9EFA",
    "DB525B8E0F19D45E394FB2091ABD72D2EA41A8A50312AEB3229A78D79404641C5290E3B8CDB9F1658C4B93996057C96B",
    "9FF0BFB3200AC6FBCC0F1A4DD5F9B3543399F18749EC464565BBE92FC5FA2C8D70A8C5BDBE92733ED39E7576F3803D03",
    "A923568CAFF214F34031F9235D6FDADC0174CC73E7D595B9B5F9B41448445A4BE643E2442B3170753A9657F1906EEC7F",
    "9ACAEF4683F44EF553A306775BDDC6D4A6C86BBC152E79E95D344EB635371BE9881BE1892249B2D224FECEEEAB38A40F",
    "BD27FDA1F10C9C75EFA965BD2B6A190FB6D4FD5ADFFD30EE5B2C217851F71D9C91A11415E577824A80345948CBEBD2D9",
    "556A5ABD9466C9E0CBF92A0C86BDFDB25B29AED71137AEBF8F96C832EB202581B571B25B92697AE6E6543574BA11D09D",
);

pub fn sample_with_prdp() -> Vec<u8> {
    hex::decode(SAMPLE_WITH_PRDP_HEX).expect("fixture is valid hex")
}

pub fn sample_without_prdp() -> Vec<u8> {
    hex::decode(SAMPLE_WITHOUT_PRDP_HEX).expect("fixture is valid hex")
}

/// Replace the 4-byte signature of a hex payload
pub fn with_signature(hex_payload: &str, signature: &str) -> String {
    format!("{}{}", signature, &hex_payload[signature.len()..])
}
