use proc_macro::TokenStream;
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::{format_ident, quote};
use syn::{
    FnArg, ImplItem, ImplItemFn, ItemImpl, LitStr, ReturnType, Token, Type, TypeParamBound,
    Visibility,
    parse::{Parse, ParseStream},
    parse_macro_input,
};

struct BootstrapperArgs {
    priority: Option<syn::Expr>,
    name: Option<LitStr>,
}

impl Parse for BootstrapperArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut priority = None;
        let mut name = None;
        while !input.is_empty() {
            let key: syn::Ident = input.parse()?;
            input.parse::<Token![=]>()?;
            if key == "priority" {
                priority = Some(input.parse()?);
            } else if key == "name" {
                name = Some(input.parse()?);
            } else {
                return Err(syn::Error::new_spanned(
                    key,
                    "expected `priority = <i32>` or `name = \"...\"`",
                ));
            }
            if input.peek(Token![,]) {
                input.parse::<Token![,]>()?;
            }
        }
        Ok(BootstrapperArgs { priority, name })
    }
}

pub fn bootstrapper_attribute(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr as BootstrapperArgs);
    let input = parse_macro_input!(item as ItemImpl);
    generate_bootstrapper_impl(&args, &input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn generate_bootstrapper_impl(
    args: &BootstrapperArgs,
    input: &ItemImpl,
) -> syn::Result<TokenStream2> {
    if let Some((_, path, _)) = &input.trait_ {
        return Err(syn::Error::new_spanned(
            path,
            "#[bootstrapper] goes on an inherent impl block",
        ));
    }
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "#[bootstrapper] cannot be applied to a generic impl",
        ));
    }

    let self_ty = &input.self_ty;
    let name = match &args.name {
        Some(name) => name.clone(),
        None => LitStr::new(&type_name(self_ty)?, Span::call_site()),
    };
    let priority = args.priority.as_ref().map(|priority| {
        quote! { const PRIORITY: i32 = #priority; }
    });

    let mut output = input.clone();
    let mut methods = Vec::new();
    for item in output.items.iter_mut() {
        let ImplItem::Fn(method) = item else {
            continue;
        };
        let marked = take_hook_marker(method);
        let public = matches!(method.vis, Visibility::Public(_));
        if marked && !public {
            return Err(syn::Error::new_spanned(
                &method.sig.ident,
                "#[hook] methods must be `pub`",
            ));
        }
        if public && (marked || is_builtin_hook(&method.sig.ident.to_string())) {
            methods.push(generate_hook_method(self_ty, method)?);
        }
    }

    Ok(quote! {
        #output

        impl ::bootwright::lifecycle::Bootstrap for #self_ty {
            const NAME: &'static str = #name;
            const MODULE_PATH: &'static str = ::core::module_path!();
            #priority

            fn hook_table() -> ::bootwright::lifecycle::HookTable {
                ::bootwright::lifecycle::HookTable::new()
                    #(.with(#methods))*
            }
        }

        ::bootwright::inventory::submit! {
            ::bootwright::lifecycle::BootstrapperEntry::of::<#self_ty>()
        }
    })
}

/// Base names of the built-in alias tables, web and wasm profiles together.
/// Each is also accepted with an `_async` suffix.
const BUILTIN_HOOKS: &[&str] = &[
    "configure_services",
    "configures_services",
    "configure_service",
    "configures_service",
    "configure_builder",
    "configures_builder",
    "configure_wasm_builder",
    "configures_wasm_builder",
    "initialize_services",
    "initializes_services",
    "initialize_service",
    "initializes_service",
    "decorate_app",
    "decorates_app",
    "decorate_application",
    "decorates_application",
    "decorate_wasm_app",
    "decorates_wasm_app",
    "decorate_wasm_application",
    "decorates_wasm_application",
];

fn is_builtin_hook(name: &str) -> bool {
    let base = name.strip_suffix("_async").unwrap_or(name);
    BUILTIN_HOOKS.contains(&base)
}

/// Remove `#[hook]` from the method, reporting whether it was there.
fn take_hook_marker(method: &mut ImplItemFn) -> bool {
    let before = method.attrs.len();
    method.attrs.retain(|attr| !attr.path().is_ident("hook"));
    method.attrs.len() != before
}

fn type_name(ty: &Type) -> syn::Result<String> {
    match ty {
        Type::Path(type_path) => type_path
            .path
            .segments
            .last()
            .map(|segment| segment.ident.to_string())
            .ok_or_else(|| syn::Error::new_spanned(ty, "expected a named type")),
        _ => Err(syn::Error::new_spanned(
            ty,
            "#[bootstrapper] needs a named type; pass `name = \"...\"`",
        )),
    }
}

/// How one parameter is produced from the hook context.
enum ParamSource {
    /// `&HookContext`
    ContextRef,
    /// `HookContext`
    ContextOwned,
    /// `Arc<T>` or `Arc<dyn Trait>`
    Shared(Type),
    /// `&T` or `&dyn Trait`
    Borrowed(Type),
    /// Any other type, cloned out of the shared instance
    Cloned(Type),
}

fn classify_param(ty: &Type) -> ParamSource {
    match ty {
        Type::Reference(reference) => {
            if is_hook_context(&reference.elem) {
                ParamSource::ContextRef
            } else {
                ParamSource::Borrowed((*reference.elem).clone())
            }
        }
        _ if is_hook_context(ty) => ParamSource::ContextOwned,
        _ => match arc_inner(ty) {
            Some(inner) => ParamSource::Shared(inner),
            None => ParamSource::Cloned(ty.clone()),
        },
    }
}

fn is_hook_context(ty: &Type) -> bool {
    matches!(ty, Type::Path(type_path)
        if type_path.path.segments.last().is_some_and(|segment| segment.ident == "HookContext"))
}

fn arc_inner(ty: &Type) -> Option<Type> {
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

fn resolve_call(ty: &Type) -> TokenStream2 {
    match ty {
        Type::TraitObject(_) => {
            quote! { ::bootwright::Resolve::resolve_trait::<#ty>(__ctx)? }
        }
        _ => quote! { ::bootwright::Resolve::resolve::<#ty>(__ctx)? },
    }
}

/// Whether the method hands back a future rather than completing when called.
fn is_deferred(method: &ImplItemFn) -> bool {
    if method.sig.asyncness.is_some() {
        return true;
    }
    match &method.sig.output {
        ReturnType::Default => false,
        ReturnType::Type(_, ty) => returns_future(ty),
    }
}

fn returns_future(ty: &Type) -> bool {
    match ty {
        Type::ImplTrait(impl_trait) => impl_trait.bounds.iter().any(|bound| {
            matches!(bound, TypeParamBound::Trait(bound)
                if bound.path.segments.last().is_some_and(|segment| segment.ident == "Future"))
        }),
        Type::Path(type_path) => type_path.path.segments.last().is_some_and(|segment| {
            matches!(
                segment.ident.to_string().as_str(),
                "Pin" | "BoxFuture" | "HookFuture"
            )
        }),
        _ => false,
    }
}

fn generate_hook_method(self_ty: &Type, method: &ImplItemFn) -> syn::Result<TokenStream2> {
    let sig = &method.sig;
    if !sig.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &sig.generics,
            "bootstrapper hooks cannot be generic",
        ));
    }

    let fn_name = &sig.ident;
    let hook_name = fn_name.to_string();

    let mut has_receiver = false;
    let mut mutable_receiver = false;
    let mut bindings = Vec::new();
    let mut call_args = Vec::new();

    for (index, input) in sig.inputs.iter().enumerate() {
        match input {
            FnArg::Receiver(receiver) => {
                has_receiver = true;
                mutable_receiver = receiver.reference.is_some() && receiver.mutability.is_some();
            }
            FnArg::Typed(pat_type) => {
                let arg = format_ident!("__arg{}", index);
                match classify_param(&pat_type.ty) {
                    ParamSource::ContextRef => call_args.push(quote! { __ctx }),
                    ParamSource::ContextOwned => {
                        call_args.push(quote! { ::core::clone::Clone::clone(__ctx) })
                    }
                    ParamSource::Shared(inner) => {
                        let resolve = resolve_call(&inner);
                        bindings.push(quote! { let #arg = #resolve; });
                        call_args.push(quote! { #arg });
                    }
                    ParamSource::Borrowed(inner) => {
                        let resolve = resolve_call(&inner);
                        bindings.push(quote! { let #arg = #resolve; });
                        call_args.push(quote! { &*#arg });
                    }
                    ParamSource::Cloned(ty) => {
                        let resolve = resolve_call(&ty);
                        bindings.push(quote! { let #arg = ::core::clone::Clone::clone(&*#resolve); });
                        call_args.push(quote! { #arg });
                    }
                }
            }
        }
    }

    let call = if has_receiver {
        let binding = if mutable_receiver {
            quote!(let mut __instance)
        } else {
            quote!(let __instance)
        };
        bindings.insert(
            0,
            quote! {
                #binding = <#self_ty as ::bootwright::Injectable>::inject(__ctx)?;
            },
        );
        quote! { __instance.#fn_name(#(#call_args),*) }
    } else {
        quote! { <#self_ty>::#fn_name(#(#call_args),*) }
    };

    if is_deferred(method) {
        Ok(quote! {
            ::bootwright::lifecycle::HookMethod::deferred(
                #hook_name,
                |__owned: ::bootwright::lifecycle::HookContext| async move {
                    let __ctx: &::bootwright::lifecycle::HookContext = &__owned;
                    #(#bindings)*
                    ::bootwright::lifecycle::IntoHookResult::into_hook_result(#call.await)
                },
            )
        })
    } else {
        Ok(quote! {
            ::bootwright::lifecycle::HookMethod::immediate(
                #hook_name,
                |__ctx: &::bootwright::lifecycle::HookContext| {
                    #(#bindings)*
                    ::bootwright::lifecycle::IntoHookResult::into_hook_result(#call)
                },
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn test_builtin_hook_names() {
        assert!(is_builtin_hook("configure_services"));
        assert!(is_builtin_hook("decorates_wasm_application_async"));
        assert!(!is_builtin_hook("start_async"));
        assert!(!is_builtin_hook("label"));
    }

    #[test]
    fn test_hook_marker_is_stripped() {
        let mut method: ImplItemFn = parse_quote! {
            #[hook]
            #[inline]
            pub fn warm_caches() {}
        };
        assert!(take_hook_marker(&mut method));
        assert_eq!(method.attrs.len(), 1);
        assert!(!take_hook_marker(&mut method));
    }

    #[test]
    fn test_helpers_are_left_out_of_the_table() {
        let input: ItemImpl = parse_quote! {
            impl WithHelper {
                pub fn configure_services() {}
                pub fn label() -> &'static str { "helper" }
                pub fn pick<T: Default>() -> T { T::default() }
            }
        };
        let args = BootstrapperArgs {
            priority: None,
            name: None,
        };
        let expanded = generate_bootstrapper_impl(&args, &input).unwrap().to_string();
        assert!(expanded.contains("\"configure_services\""));
        assert!(!expanded.contains("\"label\""));
        assert!(!expanded.contains("\"pick\""));
    }
}
