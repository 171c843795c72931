extern crate proc_macro2;

use proc_macro::TokenStream;
use quote::quote;

fn get_enum_variants(
    input: &syn::DeriveInput,
) -> &syn::punctuated::Punctuated<syn::Variant, syn::token::Comma> {
    let variants = match &input.data {
        syn::Data::Enum(enum_item) => &enum_item.variants,
        _ => panic!("Input must be an enum."),
    };

    assert!(
        variants.iter().all(|v| v.fields.is_empty()),
        "All variants must have no fields."
    );

    variants
}

/// Reads an optional `#[kw = "..."]` attribute off a variant, falling back to the variant's own
/// identifier (already-uppercase, matching the keyword text) when absent. This lets keyword
/// tables whose entries are symbols rather than words (relational operators) spell their text
/// explicitly while tables whose variant names already are the keyword (commands, functions)
/// need no attribute at all.
fn variant_keyword_bytes(v: &syn::Variant) -> Vec<u8> {
    for attr in &v.attrs {
        if attr.path.is_ident("kw") {
            if let Ok(syn::Meta::NameValue(nv)) = attr.parse_meta() {
                if let syn::Lit::Str(s) = nv.lit {
                    return s.value().into_bytes();
                }
            }
        }
    }
    v.ident.to_string().into_bytes()
}

/// Generates a `KeywordTable` impl: a static `(keyword bytes, variant)` table used by
/// [`basic8`'s keyword matcher](../basic8/keywords/index.html) (spec.md §4.A) to longest-match
/// commands, functions, relational operators and other small keyword sets out of an already
/// upper-cased byte buffer.
///
/// Grounded on `InteropGetName`, which built the same kind of "ordinal -> static name" table for
/// the vcpu teacher's opcode enums; this generalizes it to a byte-table lookup in both
/// directions and to keywords that aren't valid Rust identifiers.
#[proc_macro_derive(KeywordTable, attributes(kw))]
pub fn keyword_table_derive(input: TokenStream) -> TokenStream {
    let syn_item: syn::DeriveInput = syn::parse(input).unwrap();
    let name = &syn_item.ident;
    let variants = get_enum_variants(&syn_item);

    let entries = variants.iter().map(|v| {
        let ident = &v.ident;
        let bytes = variant_keyword_bytes(v);
        let literal = proc_macro2::Literal::byte_string(&bytes[..]);
        quote! { (#literal as &[u8], #name::#ident) }
    });

    let expanded = quote! {
        impl basic8_util::KeywordTable for #name {
            fn keywords() -> &'static [(&'static [u8], #name)] {
                const KEYWORDS: &[(&[u8], #name)] = &[#(#entries),*];
                KEYWORDS
            }
        }
    };
    expanded.into()
}
