//! Implementation of #[derive(ToArgs)]

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::ext::IdentExt;
use syn::{
    parse_macro_input, parse_quote, Attribute, Data, DeriveInput, Fields, Index, LitStr, Member,
    Type, Visibility,
};

pub fn derive_to_args_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(input) {
        Ok(expanded) => TokenStream::from(expanded),
        Err(err) => err.to_compile_error().into(),
    }
}

/// A field that takes part in encoding.
struct WalkedField {
    index: usize,
    name: String,
    member: Member,
    ty: Type,
    directive: String,
}

fn expand(mut input: DeriveInput) -> syn::Result<TokenStream2> {
    let fields = match &input.data {
        Data::Struct(data) => walked_fields(&data.fields)?,
        Data::Enum(_) => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "ToArgs can only be derived for structs, not enums",
            ))
        }
        Data::Union(_) => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "ToArgs can only be derived for structs, not unions",
            ))
        }
    };

    // Generic field types must be encodable.
    if !input.generics.params.is_empty() {
        let where_clause = input.generics.make_where_clause();
        for field in &fields {
            let ty = &field.ty;
            where_clause
                .predicates
                .push(parse_quote!(#ty: ::serde_argv::__private::serde::Serialize));
        }
    }

    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let steps = fields.iter().map(|field| {
        let index = field.index;
        let field_name = &field.name;
        let directive = &field.directive;
        let member = &field.member;
        quote! {
            walker.field(#index, #field_name, #directive, &self.#member)?;
        }
    });

    let empty_checks = fields.iter().map(|field| {
        let member = &field.member;
        quote! {
            && ::serde_argv::zero::is_zero(&self.#member)
        }
    });

    Ok(quote! {
        impl #impl_generics ::serde_argv::ToArgs for #name #ty_generics #where_clause {
            fn to_args(
                &self,
                ctx: &::serde_argv::Context,
            ) -> ::serde_argv::Result<::std::vec::Vec<::std::string::String>> {
                #[allow(unused_mut)]
                let mut walker = ::serde_argv::StructWalker::new(ctx);
                #(#steps)*
                ::std::result::Result::Ok(walker.finish())
            }

            fn is_empty(&self) -> bool {
                true #(#empty_checks)*
            }
        }

        impl #impl_generics ::serde_argv::__private::serde::Serialize for #name #ty_generics #where_clause {
            fn serialize<__S>(
                &self,
                serializer: __S,
            ) -> ::std::result::Result<__S::Ok, __S::Error>
            where
                __S: ::serde_argv::__private::serde::Serializer,
            {
                ::serde_argv::serialize_args(self, serializer)
            }
        }
    })
}

fn walked_fields(fields: &Fields) -> syn::Result<Vec<WalkedField>> {
    let mut walked = Vec::new();
    for (index, field) in fields.iter().enumerate() {
        if let Visibility::Inherited = field.vis {
            continue;
        }
        let (name, member) = match &field.ident {
            Some(ident) => (ident.unraw().to_string(), Member::Named(ident.clone())),
            None => (index.to_string(), Member::Unnamed(Index::from(index))),
        };
        walked.push(WalkedField {
            index,
            name,
            member,
            ty: field.ty.clone(),
            directive: parse_directive(&field.attrs)?,
        });
    }
    Ok(walked)
}

/// Reads `#[args("...")]`; a field without one uses the empty directive.
fn parse_directive(attrs: &[Attribute]) -> syn::Result<String> {
    let mut directive: Option<String> = None;
    for attr in attrs {
        if !attr.path().is_ident("args") {
            continue;
        }
        if directive.is_some() {
            return Err(syn::Error::new_spanned(attr, "duplicate #[args] attribute"));
        }
        let value: LitStr = attr.parse_args()?;
        directive = Some(value.value());
    }
    Ok(directive.unwrap_or_default())
}
