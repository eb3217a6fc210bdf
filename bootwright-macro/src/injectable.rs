use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Data, DeriveInput, Fields, Type, parse_macro_input};

pub fn derive_injectable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    generate_injectable_impl(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn generate_injectable_impl(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let struct_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => fields.named.iter().collect::<Vec<_>>(),
            Fields::Unit => Vec::new(),
            Fields::Unnamed(_) => {
                return Err(syn::Error::new_spanned(
                    &input.ident,
                    "#[derive(Injectable)] only supports structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "#[derive(Injectable)] can only be applied to structs",
            ));
        }
    };

    let field_injections = fields.iter().map(|field| {
        let field_name = &field.ident;
        match extract_injectable_type(&field.ty) {
            Some(field_type) => {
                let resolve_method = match &field_type {
                    Type::TraitObject(_) => quote!(resolve_trait),
                    _ => quote!(resolve),
                };
                quote! {
                    #field_name: ::bootwright::Resolve::#resolve_method::<#field_type>(resolver)?
                }
            }
            // Plain fields are cloned out of the shared instance
            None => {
                let field_type = &field.ty;
                quote! {
                    #field_name: ::core::clone::Clone::clone(
                        &*::bootwright::Resolve::resolve::<#field_type>(resolver)?
                    )
                }
            }
        }
    });

    let body = if matches!(&input.data, Data::Struct(data) if matches!(data.fields, Fields::Unit)) {
        quote!(Self)
    } else {
        quote!(Self { #(#field_injections),* })
    };

    Ok(quote! {
        impl #impl_generics ::bootwright::Injectable for #struct_name #ty_generics #where_clause {
            fn inject<R: ::bootwright::Resolve + ?Sized>(
                resolver: &R
            ) -> ::bootwright::Result<Self> {
                Ok(#body)
            }
        }
    })
}

/// Extract the inner type from Arc<T> or Arc<dyn Trait>
fn extract_injectable_type(ty: &Type) -> Option<Type> {
    if let Type::Path(type_path) = ty {
        if let Some(segment) = type_path.path.segments.last() {
            if segment.ident == "Arc" {
                if let syn::PathArguments::AngleBracketed(args) = &segment.arguments {
                    if let Some(syn::GenericArgument::Type(inner_type)) = args.args.first() {
                        return Some(inner_type.clone());
                    }
                }
            }
        }
    }

    None
}
