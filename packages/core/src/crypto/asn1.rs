//! A minimal DER decoder restricted to the two envelope shapes NSS stores in `key4.db`
//! and `logins.json`. This is deliberately not a general ASN.1 parser: only definite-length
//! SEQUENCE/OCTET STRING/OID/INTEGER tags are understood, which is all NSS ever emits here.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Asn1Error {
    #[error("malformed ASN.1 DER data")]
    Malformed,

    #[error("unexpected OID in ASN.1 envelope")]
    UnknownOid,
}

const TAG_SEQUENCE: u8 = 0x30;
const TAG_OCTET_STRING: u8 = 0x04;
const TAG_OID: u8 = 0x06;

/// pbeWithSha1AndTripleDES-CBC, 1.2.840.113549.1.12.5.1.3
const OID_PBE_SHA1_3DES: &[u8] = &[
    0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x0c, 0x05, 0x01, 0x03,
];

/// Read one TLV from the front of `data`, returning `(tag, value, rest)`.
fn read_tlv(data: &[u8]) -> Result<(u8, &[u8], &[u8]), Asn1Error> {
    let &tag = data.first().ok_or(Asn1Error::Malformed)?;
    let &len_byte = data.get(1).ok_or(Asn1Error::Malformed)?;

    let (len, header_len) = if len_byte & 0x80 == 0 {
        (len_byte as usize, 2usize)
    } else {
        let n_bytes = (len_byte & 0x7f) as usize;
        if n_bytes == 0 || n_bytes > 4 {
            return Err(Asn1Error::Malformed);
        }
        let len_bytes = data.get(2..2 + n_bytes).ok_or(Asn1Error::Malformed)?;
        let mut len = 0usize;
        for &b in len_bytes {
            len = (len << 8) | b as usize;
        }
        (len, 2 + n_bytes)
    };

    let value = data
        .get(header_len..header_len + len)
        .ok_or(Asn1Error::Malformed)?;
    let rest = data.get(header_len + len..).ok_or(Asn1Error::Malformed)?;

    Ok((tag, value, rest))
}

fn expect_tag(data: &[u8], tag: u8) -> Result<(&[u8], &[u8]), Asn1Error> {
    let (found, value, rest) = read_tlv(data)?;
    if found != tag {
        return Err(Asn1Error::Malformed);
    }
    Ok((value, rest))
}

/// `metaData.item2` / `nssPrivate.a11`: the entry salt and ciphertext they wrap.
pub struct PbeEnvelope {
    pub entry_salt: Vec<u8>,
    pub ciphertext: Vec<u8>,
}

/// Decode a `PbeEnvelope`. `metaData` and `nssPrivate` share this exact DER shape in NSS.
pub fn parse_pbe_envelope(data: &[u8]) -> Result<PbeEnvelope, Asn1Error> {
    let (outer, _) = expect_tag(data, TAG_SEQUENCE)?;

    let (alg_id, after_alg) = expect_tag(outer, TAG_SEQUENCE)?;
    let (ciphertext, _) = expect_tag(after_alg, TAG_OCTET_STRING)?;

    let (oid, after_oid) = expect_tag(alg_id, TAG_OID)?;
    if oid != OID_PBE_SHA1_3DES {
        return Err(Asn1Error::UnknownOid);
    }

    let (params, _) = expect_tag(after_oid, TAG_SEQUENCE)?;
    let (entry_salt, _) = expect_tag(params, TAG_OCTET_STRING)?;
    // A trailing INTEGER iterationCount may follow; NSS's schedule doesn't need it here.

    Ok(PbeEnvelope {
        entry_salt: entry_salt.to_vec(),
        ciphertext: ciphertext.to_vec(),
    })
}

/// Decoded from base64 `encryptedUsername` / `encryptedPassword` in `logins.json`.
pub struct LoginEnvelope {
    pub iv: Vec<u8>,
    pub ciphertext: Vec<u8>,
}

/// Decode a `LoginEnvelope`. The leading `keyId` octet string always refers to NSS's single
/// default private key and is not validated here (the caller checks it once, via
/// `nssPrivate.a102`, when deriving the master key).
pub fn parse_login_envelope(data: &[u8]) -> Result<LoginEnvelope, Asn1Error> {
    let (outer, _) = expect_tag(data, TAG_SEQUENCE)?;

    let (_key_id, after_key_id) = expect_tag(outer, TAG_OCTET_STRING)?;
    let (alg, after_alg) = expect_tag(after_key_id, TAG_SEQUENCE)?;
    let (ciphertext, _) = expect_tag(after_alg, TAG_OCTET_STRING)?;

    let (_oid, after_oid) = expect_tag(alg, TAG_OID)?;
    let (iv, _) = expect_tag(after_oid, TAG_OCTET_STRING)?;

    Ok(LoginEnvelope {
        iv: iv.to_vec(),
        ciphertext: ciphertext.to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn der_len(len: usize) -> Vec<u8> {
        assert!(len < 128, "fixture helper only handles short-form lengths");
        vec![len as u8]
    }

    #[test]
    fn parses_pbe_envelope() {
        let entry_salt = [0x01, 0x02, 0x03, 0x04];
        let ciphertext = [0xaau8; 16];

        let mut params = vec![TAG_OCTET_STRING];
        params.extend(der_len(entry_salt.len()));
        params.extend(entry_salt);

        let mut alg_id = vec![TAG_OID];
        alg_id.extend(der_len(OID_PBE_SHA1_3DES.len()));
        alg_id.extend(OID_PBE_SHA1_3DES);
        alg_id.push(TAG_SEQUENCE);
        alg_id.extend(der_len(params.len()));
        alg_id.extend(&params);

        let mut outer = vec![TAG_SEQUENCE];
        outer.extend(der_len(alg_id.len()));
        outer.extend(&alg_id);
        outer.push(TAG_OCTET_STRING);
        outer.extend(der_len(ciphertext.len()));
        outer.extend(ciphertext);

        let mut envelope = vec![TAG_SEQUENCE];
        envelope.extend(der_len(outer.len()));
        envelope.extend(&outer);

        let parsed = parse_pbe_envelope(&envelope).unwrap();
        assert_eq!(parsed.entry_salt, entry_salt);
        assert_eq!(parsed.ciphertext, ciphertext);
    }

    #[test]
    fn rejects_wrong_oid() {
        let mut alg_id = vec![TAG_OID, 0x01, 0x00];
        alg_id.push(TAG_SEQUENCE);
        alg_id.extend(der_len(0));

        let mut outer = vec![TAG_SEQUENCE];
        outer.extend(der_len(alg_id.len()));
        outer.extend(&alg_id);
        outer.push(TAG_OCTET_STRING);
        outer.extend(der_len(0));

        let mut envelope = vec![TAG_SEQUENCE];
        envelope.extend(der_len(outer.len()));
        envelope.extend(&outer);

        assert!(matches!(
            parse_pbe_envelope(&envelope),
            Err(Asn1Error::UnknownOid)
        ));
    }
}
