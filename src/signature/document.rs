//! Unsigned signature document rendering
//!
//! Produces the canonical XML skeleton the external signer computes its
//! digest and signature value over. The author and distributor documents are
//! structurally identical; only the element identifier and the role URI in
//! the signing-properties block differ. SignatureValue, X509Certificate, and
//! the `#prop` DigestValue stay empty for the signer to fill in.

use std::fmt::{self, Write};

use thiserror::Error;

use super::{Reference, SignatureRole};

const XMLDSIG_NS: &str = "http://www.w3.org/2000/09/xmldsig#";
const C14N_EXC_ALGORITHM: &str = "http://www.w3.org/2001/10/xml-exc-c14n#";
const C14N11_ALGORITHM: &str = "http://www.w3.org/2006/12/xml-c14n11";
const SIGNATURE_ALGORITHM: &str = "http://www.w3.org/2001/04/xmldsig-more#rsa-sha256";
const DIGEST_ALGORITHM: &str = "http://www.w3.org/2001/04/xmlenc#sha256";
const DSP_NS: &str = "http://www.w3.org/2009/xmldsig-properties";
const PROFILE_URI: &str = "http://www.w3.org/ns/widgets-digsig#profile";

/// Errors from document rendering. Rendering writes into a `String` and
/// cannot fail on well-formed references; a failure here indicates a
/// programming error.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("signature document rendering failed: {0}")]
    Render(#[from] fmt::Error),
}

/// Render the unsigned signature document for a role over an ordered
/// reference list.
pub fn render_unsigned(
    role: SignatureRole,
    references: &[Reference],
) -> Result<String, DocumentError> {
    let id = role.element_id();
    let mut doc = String::new();

    writeln!(doc, r#"<Signature xmlns="{XMLDSIG_NS}" Id="{id}">"#)?;
    writeln!(doc, "<SignedInfo>")?;
    writeln!(
        doc,
        r#"<CanonicalizationMethod Algorithm="{C14N_EXC_ALGORITHM}"></CanonicalizationMethod>"#
    )?;
    writeln!(
        doc,
        r#"<SignatureMethod Algorithm="{SIGNATURE_ALGORITHM}"></SignatureMethod>"#
    )?;
    for reference in references {
        writeln!(doc, r#"<Reference URI="{}">"#, xml_escape(&reference.uri))?;
        writeln!(
            doc,
            r#"<DigestMethod Algorithm="{DIGEST_ALGORITHM}"></DigestMethod>"#
        )?;
        writeln!(doc, "<DigestValue>{}</DigestValue>", reference.digest)?;
        writeln!(doc, "</Reference>")?;
    }
    // Self-reference covering the signing-properties object below; its
    // digest is computed by the signer over the canonicalized object.
    writeln!(doc, r##"<Reference URI="#prop">"##)?;
    writeln!(doc, "<Transforms>")?;
    writeln!(doc, r#"<Transform Algorithm="{C14N11_ALGORITHM}"></Transform>"#)?;
    writeln!(doc, "</Transforms>")?;
    writeln!(
        doc,
        r#"<DigestMethod Algorithm="{DIGEST_ALGORITHM}"></DigestMethod>"#
    )?;
    writeln!(doc, "<DigestValue></DigestValue>")?;
    writeln!(doc, "</Reference>")?;
    writeln!(doc, "</SignedInfo>")?;
    writeln!(doc, "<SignatureValue>")?;
    writeln!(doc, "</SignatureValue>")?;
    writeln!(doc, "<KeyInfo>")?;
    writeln!(doc, "<X509Data>")?;
    writeln!(doc, "<X509Certificate>")?;
    writeln!(doc, "</X509Certificate>")?;
    writeln!(doc, "</X509Data>")?;
    writeln!(doc, "</KeyInfo>")?;
    write!(doc, r#"<Object Id="prop">"#)?;
    write!(doc, r#"<SignatureProperties xmlns:dsp="{DSP_NS}">"#)?;
    write!(
        doc,
        r##"<SignatureProperty Id="profile" Target="#{id}"><dsp:Profile URI="{PROFILE_URI}"></dsp:Profile></SignatureProperty>"##
    )?;
    write!(
        doc,
        r##"<SignatureProperty Id="role" Target="#{id}"><dsp:Role URI="{}"></dsp:Role></SignatureProperty>"##,
        role.role_uri()
    )?;
    write!(
        doc,
        r##"<SignatureProperty Id="identifier" Target="#{id}"><dsp:Identifier></dsp:Identifier></SignatureProperty>"##
    )?;
    writeln!(doc, "</SignatureProperties></Object>")?;
    writeln!(doc, "</Signature>")?;

    Ok(doc)
}

/// Minimal escaping for reference URIs placed in attribute position
fn xml_escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
